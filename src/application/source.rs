//! Content-service seam consumed by the resolver.

use std::num::NonZeroU32;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::domain::category::Category;
use crate::domain::collections::CollectionSchema;
use crate::domain::content::ContentRecord;
use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("content service responded with status {status}")]
    Status { status: u16 },
    #[error("malformed payload: {0}")]
    Payload(String),
    #[error(transparent)]
    Schema(#[from] DomainError),
}

impl SourceError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn payload(err: impl std::fmt::Display) -> Self {
        Self::Payload(err.to_string())
    }
}

/// Read access to the content service collections.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// The most recently updated content record, if any exists.
    async fn latest_content(&self) -> Result<Option<ContentRecord>, SourceError>;

    /// Up to `limit` categories ordered by title ascending.
    async fn categories(&self, limit: NonZeroU32) -> Result<Vec<Category>, SourceError>;
}

/// Decode the `docs` array of a list response, validating every record
/// against `schema` before converting it.
pub fn decode_docs<T>(schema: &CollectionSchema, envelope: Value) -> Result<Vec<T>, SourceError>
where
    T: DeserializeOwned,
{
    let Value::Object(mut envelope) = envelope else {
        return Err(SourceError::payload("list response must be a JSON object"));
    };

    let docs = match envelope.remove("docs") {
        Some(Value::Array(docs)) => docs,
        Some(_) => return Err(SourceError::payload("`docs` must be an array")),
        None => return Err(SourceError::payload("response is missing `docs`")),
    };

    docs.into_iter()
        .map(|mut doc| -> Result<T, SourceError> {
            schema.validate(&doc)?;
            if let Some(object) = doc.as_object_mut() {
                schema.apply_defaults(object);
            }
            serde_json::from_value(doc).map_err(SourceError::payload)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::document::Document;

    #[test]
    fn decodes_content_docs_with_defaults() {
        let records: Vec<ContentRecord> = decode_docs(
            &CollectionSchema::content(),
            json!({ "docs": [{ "title": "T", "body": "<p>x</p>" }], "totalDocs": 1 }),
        )
        .expect("decode");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug.as_deref(), Some("homepage-content"));
        assert_eq!(records[0].body, Some(Document::RawMarkup("<p>x</p>".into())));
    }

    #[test]
    fn rejects_bad_envelopes() {
        let schema = CollectionSchema::categories();
        assert!(matches!(
            decode_docs::<Category>(&schema, json!([])),
            Err(SourceError::Payload(_))
        ));
        assert!(matches!(
            decode_docs::<Category>(&schema, json!({ "errors": [] })),
            Err(SourceError::Payload(_))
        ));
        assert!(matches!(
            decode_docs::<Category>(&schema, json!({ "docs": {} })),
            Err(SourceError::Payload(_))
        ));
    }

    #[test]
    fn schema_violation_fails_the_batch() {
        let result = decode_docs::<Category>(
            &CollectionSchema::categories(),
            json!({ "docs": [{ "id": 1, "title": "A", "slug": "a" }, { "id": 2, "title": "B" }] }),
        );
        assert!(matches!(result, Err(SourceError::Schema(_))));
    }

    #[test]
    fn empty_docs_are_valid() {
        let categories: Vec<Category> =
            decode_docs(&CollectionSchema::categories(), json!({ "docs": [] })).expect("decode");
        assert!(categories.is_empty());
    }
}
