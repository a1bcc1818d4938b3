use crate::application::render::{adapt_categories, render_body};
use crate::application::resolver::ContentResolver;
use crate::presentation::views::ContentPageView;

/// Builds the content page from freshly resolved content and categories.
#[derive(Clone)]
pub struct ContentPageService {
    resolver: ContentResolver,
    admin_url: String,
}

impl ContentPageService {
    pub fn new(resolver: ContentResolver, admin_url: impl Into<String>) -> Self {
        Self {
            resolver,
            admin_url: admin_url.into(),
        }
    }

    pub async fn page_view(&self) -> ContentPageView {
        let (content, categories) = self.resolver.resolve_page().await;

        ContentPageView {
            blocks: render_body(content.document.as_ref()),
            categories: adapt_categories(&categories),
            last_updated: content.last_updated.date().to_string(),
            title: content.title,
            admin_url: self.admin_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroU32, sync::Arc};

    use async_trait::async_trait;

    use super::*;
    use crate::application::render::RenderedBlock;
    use crate::application::source::{ContentSource, SourceError};
    use crate::domain::category::Category;
    use crate::domain::content::{ContentRecord, FALLBACK_MARKUP};

    struct Offline;

    #[async_trait]
    impl ContentSource for Offline {
        async fn latest_content(&self) -> Result<Option<ContentRecord>, SourceError> {
            Err(SourceError::transport("offline"))
        }

        async fn categories(&self, _limit: NonZeroU32) -> Result<Vec<Category>, SourceError> {
            Err(SourceError::transport("offline"))
        }
    }

    #[tokio::test]
    async fn offline_service_yields_fallback_page() {
        let service = ContentPageService::new(
            ContentResolver::with_default_limit(Arc::new(Offline)),
            "http://localhost:3000/admin",
        );

        let view = service.page_view().await;
        assert_eq!(view.title, "Welcome to Our Content Page");
        assert_eq!(view.last_updated, "2024-01-15");
        assert_eq!(
            view.blocks,
            vec![RenderedBlock::TrustedMarkup(FALLBACK_MARKUP.to_string())]
        );
        assert!(view.categories.is_empty());
        assert_eq!(view.admin_url, "http://localhost:3000/admin");
    }
}
