//! HTTP client for the headless CMS REST API.

use std::{num::NonZeroU32, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, Url,
    header::{CACHE_CONTROL, EXPIRES, PRAGMA},
};
use serde_json::Value;
use tracing::debug;

use crate::application::source::{ContentSource, SourceError, decode_docs};
use crate::config::ContentServiceSettings;
use crate::domain::category::Category;
use crate::domain::collections::{CATEGORIES_SLUG, CONTENT_SLUG, CollectionSchema};
use crate::domain::content::ContentRecord;

use super::error::InfraError;

const TARGET: &str = "contentpage::infra::cms";

#[derive(Clone, Debug)]
pub struct CmsClient {
    client: Client,
    base: Url,
    content_schema: CollectionSchema,
    categories_schema: CollectionSchema,
}

impl CmsClient {
    pub fn new(base: &Url, timeout: Duration) -> Result<Self, InfraError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base,
            content_schema: CollectionSchema::content(),
            categories_schema: CollectionSchema::categories(),
        })
    }

    pub fn from_settings(settings: &ContentServiceSettings) -> Result<Self, InfraError> {
        Self::new(&settings.base_url, settings.request_timeout)
    }

    pub fn user_agent() -> &'static str {
        concat!("contentpage/", env!("CARGO_PKG_VERSION"))
    }

    fn collection_url(&self, collection: &str) -> Result<Url, SourceError> {
        self.base
            .join(&format!("api/{collection}"))
            .map_err(SourceError::transport)
    }

    /// GET a collection listing with caching disabled end to end.
    async fn list(
        &self,
        collection: &str,
        query: &[(&str, String)],
    ) -> Result<Value, SourceError> {
        let mut url = self.collection_url(collection)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        debug!(target = TARGET, %url, "requesting collection");

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(PRAGMA, "no-cache")
            .header(EXPIRES, "0")
            .send()
            .await
            .map_err(SourceError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(SourceError::payload)
    }
}

#[async_trait]
impl ContentSource for CmsClient {
    async fn latest_content(&self) -> Result<Option<ContentRecord>, SourceError> {
        let envelope = self
            .list(
                CONTENT_SLUG,
                &[("sort", "-updatedAt".to_string()), ("limit", "1".to_string())],
            )
            .await?;
        let records: Vec<ContentRecord> = decode_docs(&self.content_schema, envelope)?;
        Ok(records.into_iter().next())
    }

    async fn categories(&self, limit: NonZeroU32) -> Result<Vec<Category>, SourceError> {
        let envelope = self
            .list(
                CATEGORIES_SLUG,
                &[("sort", "title".to_string()), ("limit", limit.to_string())],
            )
            .await?;
        decode_docs(&self.categories_schema, envelope)
    }
}
