use crate::application::error::{ErrorReport, HttpError};
use crate::application::render::RenderedBlock;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

const DESCRIPTION_MAX_CHARS: usize = 180;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response() -> Response {
    let mut response = (StatusCode::NOT_FOUND, "Resource not found").into_response();
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// How trusted markup blocks are written into the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawMarkupPolicy {
    /// Emit verbatim; the content service is a trusted source.
    #[default]
    Trusted,
    /// Run through `ammonia` before emitting.
    Sanitized,
}

impl RawMarkupPolicy {
    pub fn from_flag(sanitize: bool) -> Self {
        if sanitize {
            Self::Sanitized
        } else {
            Self::Trusted
        }
    }

    fn apply(self, markup: &str) -> String {
        match self {
            Self::Trusted => markup.to_string(),
            Self::Sanitized => ammonia::clean(markup),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub image_url: Option<String>,
}

/// Everything the content page shows, before it is turned into markup.
#[derive(Debug, Clone, Serialize)]
pub struct ContentPageView {
    pub title: String,
    pub last_updated: String,
    #[serde(skip)]
    pub admin_url: String,
    pub blocks: Vec<RenderedBlock>,
    pub categories: Vec<CategoryView>,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
}

impl PageMetaView {
    pub fn for_content(page: &ContentPageView) -> Self {
        Self {
            title: page.title.clone(),
            description: describe_blocks(&page.blocks, DESCRIPTION_MAX_CHARS),
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(meta: PageMetaView, content: T) -> Self {
        Self { meta, content }
    }
}

/// Block shaped for the template: `kind` is one of `markup`, `p`, `h2`,
/// `h3` or `ul`.
pub struct BlockView {
    pub kind: &'static str,
    pub text: String,
    pub items: Vec<String>,
}

impl BlockView {
    fn from_block(block: &RenderedBlock, policy: RawMarkupPolicy) -> Self {
        match block {
            RenderedBlock::TrustedMarkup(markup) => Self::text_block("markup", policy.apply(markup)),
            RenderedBlock::Paragraph(text) => Self::text_block("p", text.clone()),
            RenderedBlock::Heading { level, text } => Self::text_block(level.tag(), text.clone()),
            RenderedBlock::List(items) => Self {
                kind: "ul",
                text: String::new(),
                items: items.clone(),
            },
        }
    }

    fn text_block(kind: &'static str, text: String) -> Self {
        Self {
            kind,
            text,
            items: Vec::new(),
        }
    }
}

pub struct ContentBody {
    pub title: String,
    pub last_updated: String,
    pub admin_url: String,
    pub blocks: Vec<BlockView>,
    pub categories: Vec<CategoryView>,
}

impl ContentBody {
    pub fn from_page(page: ContentPageView, policy: RawMarkupPolicy) -> Self {
        let blocks = page
            .blocks
            .iter()
            .map(|block| BlockView::from_block(block, policy))
            .collect();

        Self {
            title: page.title,
            last_updated: page.last_updated,
            admin_url: page.admin_url,
            blocks,
            categories: page.categories,
        }
    }
}

#[derive(Template)]
#[template(path = "content.html")]
pub struct ContentTemplate {
    pub view: LayoutContext<ContentBody>,
}

impl ContentTemplate {
    pub fn new(page: ContentPageView, policy: RawMarkupPolicy) -> Self {
        let meta = PageMetaView::for_content(&page);
        Self {
            view: LayoutContext::new(meta, ContentBody::from_page(page, policy)),
        }
    }
}

/// First non-empty paragraph, cut to `max_chars`.
fn describe_blocks(blocks: &[RenderedBlock], max_chars: usize) -> String {
    blocks
        .iter()
        .find_map(|block| match block {
            RenderedBlock::Paragraph(text) if !text.trim().is_empty() => Some(text.trim()),
            _ => None,
        })
        .map(|text| text.chars().take(max_chars).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render::HeadingLevel;

    fn page(blocks: Vec<RenderedBlock>, categories: Vec<CategoryView>) -> ContentPageView {
        ContentPageView {
            title: "About <us>".to_string(),
            last_updated: "2024-06-01".to_string(),
            admin_url: "http://cms.local/admin".to_string(),
            blocks,
            categories,
        }
    }

    #[test]
    fn template_escapes_text_and_keeps_trusted_markup() {
        let html = ContentTemplate::new(
            page(
                vec![
                    RenderedBlock::Heading {
                        level: HeadingLevel::H2,
                        text: "Intro".to_string(),
                    },
                    RenderedBlock::Paragraph("a <b>bold</b> claim".to_string()),
                    RenderedBlock::List(vec!["one & two".to_string()]),
                    RenderedBlock::TrustedMarkup("<em data-x=\"1\">raw</em>".to_string()),
                ],
                vec![],
            ),
            RawMarkupPolicy::Trusted,
        )
        .render()
        .expect("render");

        assert!(html.contains("<h1>About &#60;us&#62;</h1>"));
        assert!(html.contains("<h2>Intro</h2>"));
        assert!(html.contains("<p>a &#60;b&#62;bold&#60;/b&#62; claim</p>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("<li>one &#38; two</li>"));
        assert!(html.contains("<em data-x=\"1\">raw</em>"));
        assert!(html.contains("Last updated: "));
        assert!(html.contains("Edit in CMS"));
        assert!(!html.contains("Categories"));
    }

    #[test]
    fn sanitized_policy_strips_scripts() {
        let html = ContentTemplate::new(
            page(
                vec![RenderedBlock::TrustedMarkup(
                    "<p>ok</p><script>alert(1)</script>".to_string(),
                )],
                vec![],
            ),
            RawMarkupPolicy::Sanitized,
        )
        .render()
        .expect("render");

        assert!(html.contains("<p>ok</p>"));
        assert!(!html.contains("alert(1)"));
    }

    #[test]
    fn categories_section_lists_cards_with_optional_images() {
        let html = ContentTemplate::new(
            page(
                vec![],
                vec![
                    CategoryView {
                        id: "1".to_string(),
                        title: "Art".to_string(),
                        slug: "art".to_string(),
                        image_url: Some("https://cdn.example.com/art.png".to_string()),
                    },
                    CategoryView {
                        id: "2".to_string(),
                        title: "Books".to_string(),
                        slug: "books".to_string(),
                        image_url: None,
                    },
                ],
            ),
            RawMarkupPolicy::Trusted,
        )
        .render()
        .expect("render");

        assert!(html.contains("Categories"));
        assert!(html.contains("Slug: art"));
        assert!(html.contains("Slug: books"));
        assert_eq!(html.matches("<img").count(), 1);
        let art = html.find("Art").expect("art card");
        let books = html.find("Books").expect("books card");
        assert!(art < books);
    }

    #[test]
    fn description_uses_first_paragraph() {
        let blocks = vec![
            RenderedBlock::Heading {
                level: HeadingLevel::H2,
                text: "Head".to_string(),
            },
            RenderedBlock::Paragraph("  ".to_string()),
            RenderedBlock::Paragraph("Welcome aboard".to_string()),
        ];
        assert_eq!(describe_blocks(&blocks, 7), "Welcome");
        assert_eq!(describe_blocks(&[], 7), "");
    }
}
