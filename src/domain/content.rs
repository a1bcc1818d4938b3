//! Content records and the resolved content handed to the page.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, macros::datetime};

use super::document::Document;

/// Markup shown whenever no live document is available.
pub const FALLBACK_MARKUP: &str = r#"
    <h2>About This Page</h2>
    <p>This is a sample content page that demonstrates how content can be managed through the CMS. The content you see here is static placeholder data shown while the content service is unavailable.</p>

    <h3>Features</h3>
    <ul>
      <li>Rich text editing capabilities</li>
      <li>Easy content management through the admin panel</li>
      <li>Real-time updates on the frontend</li>
      <li>SEO-friendly content structure</li>
    </ul>

    <h3>Getting Started</h3>
    <p>To edit this content, open the CMS admin panel at <a href="/admin">/admin</a> and look for the "Content" collection.</p>

    <blockquote>
      "Content is king, but context is the kingdom." - This content can be easily updated through the CMS!
    </blockquote>
"#;

pub const FALLBACK_TITLE: &str = "Welcome to Our Content Page";

pub const FALLBACK_LAST_UPDATED: OffsetDateTime = datetime!(2024-01-15 00:00 UTC);

static FALLBACK_CONTENT: Lazy<ResolvedContent> = Lazy::new(|| ResolvedContent {
    title: FALLBACK_TITLE.to_string(),
    document: Some(Document::RawMarkup(FALLBACK_MARKUP.to_string())),
    last_updated: FALLBACK_LAST_UPDATED,
});

/// Record from the `content` collection, as returned by the content service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub title: String,
    #[serde(default)]
    pub body: Option<Document>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Content ready for rendering; produced fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedContent {
    pub title: String,
    pub document: Option<Document>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl ResolvedContent {
    /// The fixed content substituted when the live record cannot be resolved.
    pub fn fallback() -> Self {
        FALLBACK_CONTENT.clone()
    }

    pub fn is_fallback(&self) -> bool {
        *self == *FALLBACK_CONTENT
    }
}

impl From<ContentRecord> for ResolvedContent {
    fn from(record: ContentRecord) -> Self {
        Self {
            title: record.title,
            document: Document::non_empty(record.body),
            last_updated: record.updated_at.unwrap_or(FALLBACK_LAST_UPDATED),
        }
    }
}
