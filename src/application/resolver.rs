//! Resolves the live content and categories, degrading to fixed fallbacks.
//!
//! Failures never reach the caller: every error from the content source is
//! logged, counted and replaced by [`ResolvedContent::fallback`] or an empty
//! category list. The two lookups are independent and run concurrently.

use std::{num::NonZeroU32, sync::Arc, time::Instant};

use metrics::{counter, histogram};
use tracing::{debug, info, warn};

use crate::application::source::ContentSource;
use crate::domain::category::Category;
use crate::domain::content::ResolvedContent;

const TARGET: &str = "contentpage::resolver";
pub const DEFAULT_CATEGORIES_LIMIT: NonZeroU32 = NonZeroU32::new(10).unwrap();

#[derive(Clone)]
pub struct ContentResolver {
    source: Arc<dyn ContentSource>,
    categories_limit: NonZeroU32,
}

impl ContentResolver {
    pub fn new(source: Arc<dyn ContentSource>, categories_limit: NonZeroU32) -> Self {
        Self {
            source,
            categories_limit,
        }
    }

    pub fn with_default_limit(source: Arc<dyn ContentSource>) -> Self {
        Self::new(source, DEFAULT_CATEGORIES_LIMIT)
    }

    pub fn categories_limit(&self) -> NonZeroU32 {
        self.categories_limit
    }

    pub async fn resolve_content(&self) -> ResolvedContent {
        let started = Instant::now();
        let outcome = self.source.latest_content().await;
        record_latency("content", started);

        match outcome {
            Ok(Some(record)) => {
                debug!(
                    target = TARGET,
                    title = %record.title,
                    slug = record.slug.as_deref().unwrap_or(""),
                    "fetched content"
                );
                ResolvedContent::from(record)
            }
            Ok(None) => {
                info!(target = TARGET, "content service returned no content record");
                record_fallback("content");
                ResolvedContent::fallback()
            }
            Err(err) => {
                warn!(target = TARGET, error = %err, "failed to fetch content; using fallback");
                record_fallback("content");
                ResolvedContent::fallback()
            }
        }
    }

    pub async fn resolve_categories(&self) -> Vec<Category> {
        let started = Instant::now();
        let outcome = self.source.categories(self.categories_limit).await;
        record_latency("categories", started);

        match outcome {
            Ok(categories) => {
                debug!(target = TARGET, count = categories.len(), "fetched categories");
                categories
            }
            Err(err) => {
                warn!(target = TARGET, error = %err, "failed to fetch categories; showing none");
                record_fallback("categories");
                Vec::new()
            }
        }
    }

    /// Resolve content and categories concurrently.
    pub async fn resolve_page(&self) -> (ResolvedContent, Vec<Category>) {
        tokio::join!(self.resolve_content(), self.resolve_categories())
    }
}

fn record_fallback(resource: &'static str) {
    counter!("contentpage_resolver_fallback_total", "resource" => resource).increment(1);
}

fn record_latency(resource: &'static str, started: Instant) {
    histogram!("contentpage_fetch_ms", "resource" => resource)
        .record(started.elapsed().as_secs_f64() * 1000.0);
}
