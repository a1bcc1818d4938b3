use std::{num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use contentpage::{
    application::{
        resolver::ContentResolver,
        source::{ContentSource, SourceError},
    },
    domain::{category::Category, content::ContentRecord},
};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

struct Unavailable;

#[async_trait]
impl ContentSource for Unavailable {
    async fn latest_content(&self) -> Result<Option<ContentRecord>, SourceError> {
        Err(SourceError::transport("connection refused"))
    }

    async fn categories(&self, _limit: NonZeroU32) -> Result<Vec<Category>, SourceError> {
        Err(SourceError::Status { status: 500 })
    }
}

#[tokio::test]
async fn fallbacks_are_counted_per_resource() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let resolver = ContentResolver::with_default_limit(Arc::new(Unavailable));
    let (content, categories) = resolver.resolve_page().await;
    assert!(content.is_fallback());
    assert!(categories.is_empty());
    resolver.resolve_content().await;

    let mut fallbacks = Vec::new();
    let mut latencies = Vec::new();
    for (key, _, _, value) in snapshotter.snapshot().into_vec() {
        let resource = key
            .key()
            .labels()
            .find(|label| label.key() == "resource")
            .map(|label| label.value().to_string())
            .expect("resource label");
        match (key.key().name(), value) {
            ("contentpage_resolver_fallback_total", DebugValue::Counter(count)) => {
                fallbacks.push((resource, count));
            }
            ("contentpage_fetch_ms", DebugValue::Histogram(samples)) => {
                latencies.push((resource, samples.len()));
            }
            _ => {}
        }
    }
    fallbacks.sort();
    latencies.sort();

    assert_eq!(
        fallbacks,
        [("categories".to_string(), 1), ("content".to_string(), 2)]
    );
    assert_eq!(
        latencies,
        [("categories".to_string(), 1), ("content".to_string(), 2)]
    );
}
