//! Turns a content document into presentation blocks.
//!
//! The walk is a single dispatch over the closed node enums. Unrecognized kinds
//! contribute nothing and never fail; output order always follows input order.
//! Text is emitted unescaped: escaping belongs to whichever layer writes markup.

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::content::FALLBACK_MARKUP;
use crate::domain::document::{BlockNode, Document, HeadingTag, InlineNode, ListItem, ListType};
use crate::presentation::views::CategoryView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadingLevel {
    H2,
    H3,
}

impl HeadingLevel {
    pub fn tag(self) -> &'static str {
        match self {
            Self::H2 => "h2",
            Self::H3 => "h3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum RenderedBlock {
    /// Markup from a trusted source, emitted verbatim.
    TrustedMarkup(String),
    Paragraph(String),
    Heading { level: HeadingLevel, text: String },
    List(Vec<String>),
}

/// Render a document into blocks.
pub fn render(document: &Document) -> Vec<RenderedBlock> {
    match document {
        Document::RawMarkup(markup) => vec![RenderedBlock::TrustedMarkup(markup.clone())],
        Document::Structured(tree) => tree.root.children.iter().filter_map(render_block).collect(),
    }
}

/// Render an optional body; an absent body shows the fallback markup.
pub fn render_body(document: Option<&Document>) -> Vec<RenderedBlock> {
    match document {
        Some(document) => render(document),
        None => vec![RenderedBlock::TrustedMarkup(FALLBACK_MARKUP.to_string())],
    }
}

fn render_block(node: &BlockNode) -> Option<RenderedBlock> {
    match node {
        BlockNode::Paragraph { children } => Some(RenderedBlock::Paragraph(inline_text(children))),
        BlockNode::Heading {
            tag: HeadingTag::H2,
            children,
        } => Some(RenderedBlock::Heading {
            level: HeadingLevel::H2,
            text: inline_text(children),
        }),
        BlockNode::Heading {
            tag: HeadingTag::H3,
            children,
        } => Some(RenderedBlock::Heading {
            level: HeadingLevel::H3,
            text: inline_text(children),
        }),
        BlockNode::List {
            list_type: ListType::Bullet,
            children,
        } => Some(RenderedBlock::List(children.iter().map(item_text).collect())),
        BlockNode::Heading {
            tag: HeadingTag::Other,
            ..
        }
        | BlockNode::List {
            list_type: ListType::Other,
            ..
        }
        | BlockNode::Unrecognized => None,
    }
}

fn item_text(item: &ListItem) -> String {
    inline_text(&item.children)
}

fn inline_text(children: &[InlineNode]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            InlineNode::Text { text: value } => text.push_str(value),
            InlineNode::Unrecognized => {}
        }
    }
    text
}

/// Map categories to their display form, keeping order.
pub fn adapt_categories(categories: &[Category]) -> Vec<CategoryView> {
    categories
        .iter()
        .map(|category| CategoryView {
            id: category.id.to_string(),
            title: category.title.clone(),
            slug: category.slug.clone(),
            image_url: category.image_url.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use insta::assert_debug_snapshot;
    use serde_json::json;

    use super::*;
    use crate::domain::category::CategoryId;

    fn structured(value: serde_json::Value) -> Document {
        serde_json::from_value(value).expect("document")
    }

    #[test]
    fn raw_markup_is_a_single_trusted_block() {
        for markup in ["<p>Hi</p>", "", "<script>trusted()</script>"] {
            let blocks = render(&Document::RawMarkup(markup.to_string()));
            assert_eq!(blocks, vec![RenderedBlock::TrustedMarkup(markup.to_string())]);
        }
    }

    #[test]
    fn absent_body_renders_fallback_markup() {
        let expected = vec![RenderedBlock::TrustedMarkup(FALLBACK_MARKUP.to_string())];
        assert_eq!(render_body(None), expected);
        assert_eq!(
            render_body(Some(&Document::RawMarkup(" \n".into()))),
            vec![RenderedBlock::TrustedMarkup(" \n".to_string())]
        );
    }

    #[test]
    fn heading_then_paragraph() {
        let doc = structured(json!({
            "root": { "children": [
                { "type": "heading", "tag": "h2", "children": [{ "type": "text", "text": "About" }] },
                { "type": "paragraph", "children": [{ "type": "text", "text": "Hello" }] }
            ]}
        }));

        assert_debug_snapshot!(render(&doc), @r#"
        [
            Heading {
                level: H2,
                text: "About",
            },
            Paragraph(
                "Hello",
            ),
        ]
        "#);
    }

    #[test]
    fn bullet_list_items() {
        let doc = structured(json!({
            "root": { "children": [
                { "type": "list", "listType": "bullet", "children": [
                    { "children": [{ "type": "text", "text": "One" }] },
                    { "children": [{ "type": "text", "text": "Two" }] }
                ]}
            ]}
        }));

        assert_eq!(
            render(&doc),
            vec![RenderedBlock::List(vec!["One".to_string(), "Two".to_string()])]
        );
    }

    #[test]
    fn inline_text_concatenates_in_order() {
        let doc = structured(json!({
            "root": { "children": [
                { "type": "paragraph", "children": [
                    { "type": "text", "text": "Hello, " },
                    { "type": "link", "children": [{ "type": "text", "text": "ignored" }] },
                    { "type": "text", "text": "<b>world</b>" }
                ]},
                { "type": "heading", "tag": "h3", "children": [{ "type": "text", "text": "Sub" }] }
            ]}
        }));

        assert_eq!(
            render(&doc),
            vec![
                RenderedBlock::Paragraph("Hello, <b>world</b>".to_string()),
                RenderedBlock::Heading {
                    level: HeadingLevel::H3,
                    text: "Sub".to_string(),
                },
            ]
        );
    }

    #[test]
    fn unrecognized_blocks_are_skipped_in_place() {
        let doc = structured(json!({
            "root": { "children": [
                { "type": "quote", "children": [{ "type": "text", "text": "q" }] },
                { "type": "paragraph", "children": [{ "type": "text", "text": "first" }] },
                { "type": "heading", "tag": "h1", "children": [{ "type": "text", "text": "big" }] },
                { "type": "list", "listType": "number", "children": [{ "children": [] }] },
                { "type": "heading", "tag": "h2", "children": [{ "type": "text", "text": "second" }] },
                { "type": "horizontalrule" },
                { "type": "paragraph" }
            ]}
        }));

        assert_eq!(
            render(&doc),
            vec![
                RenderedBlock::Paragraph("first".to_string()),
                RenderedBlock::Heading {
                    level: HeadingLevel::H2,
                    text: "second".to_string(),
                },
                RenderedBlock::Paragraph(String::new()),
            ]
        );
    }

    #[test]
    fn recognized_blocks_map_one_to_one() {
        let children: Vec<_> = (0..25)
            .map(|i| match i % 4 {
                0 => json!({ "type": "paragraph", "children": [{ "type": "text", "text": i.to_string() }] }),
                1 => json!({ "type": "heading", "tag": "h2", "children": [] }),
                2 => json!({ "type": "heading", "tag": "h3" }),
                _ => json!({ "type": "list", "listType": "bullet", "children": null }),
            })
            .collect();
        let doc = structured(json!({ "root": { "children": children } }));

        let blocks = render(&doc);
        assert_eq!(blocks.len(), 25);
        assert_eq!(blocks[0], RenderedBlock::Paragraph("0".to_string()));
        assert_eq!(blocks[24], RenderedBlock::Paragraph("24".to_string()));
        assert_eq!(blocks[3], RenderedBlock::List(Vec::new()));
    }

    #[test]
    fn rendering_is_repeatable_and_leaves_input_untouched() {
        let doc = structured(json!({
            "root": { "children": [
                { "type": "paragraph", "children": [{ "type": "text", "text": "x" }] },
                { "type": "unknown" }
            ]}
        }));
        let before = doc.clone();

        let first = render(&doc);
        let second = render(&doc);
        assert_eq!(first, second);
        assert_eq!(doc, before);
    }

    #[test]
    fn blocks_serialize_with_kind_tags() {
        let value = serde_json::to_value(vec![
            RenderedBlock::Heading {
                level: HeadingLevel::H2,
                text: "About".to_string(),
            },
            RenderedBlock::List(vec!["One".to_string()]),
        ])
        .expect("serialize");

        assert_eq!(
            value,
            json!([
                { "kind": "heading", "content": { "level": "H2", "text": "About" } },
                { "kind": "list", "content": ["One"] }
            ])
        );
    }

    #[test]
    fn categories_adapt_in_order_with_optional_images() {
        let categories = vec![
            Category {
                id: CategoryId::new("1"),
                title: "Art".to_string(),
                slug: "art".to_string(),
                image_url: Some("/media/art.png".to_string()),
            },
            Category {
                id: CategoryId::new("2"),
                title: "Books".to_string(),
                slug: "books".to_string(),
                image_url: None,
            },
            Category {
                id: CategoryId::new("3"),
                title: "Cinema".to_string(),
                slug: "cinema".to_string(),
                image_url: Some("https://cdn.example.com/cinema.jpg".to_string()),
            },
        ];

        let views = adapt_categories(&categories);
        assert_eq!(
            views.iter().map(|v| v.title.as_str()).collect::<Vec<_>>(),
            ["Art", "Books", "Cinema"]
        );
        assert_eq!(views[0].image_url.as_deref(), Some("/media/art.png"));
        assert_eq!(views[1].image_url, None);
        assert_eq!(
            views[2].image_url.as_deref(),
            Some("https://cdn.example.com/cinema.jpg")
        );
        assert_eq!(views[2].id, "3");
    }
}
