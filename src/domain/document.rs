//! Rich-text document model as delivered by the content service.
//!
//! A body is either legacy raw markup or a Lexical-style node tree. The tree is
//! decoded leniently: absent or `null` child sequences are empty, unknown node
//! kinds decode to an `Unrecognized` arm, and a child that cannot be decoded at
//! all is treated the same way instead of failing the whole document.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// Content body, decided once when a record is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    /// Legacy HTML string, trusted as-is.
    RawMarkup(String),
    /// Structured node tree.
    Structured(StructuredDocument),
}

impl Document {
    /// Normalise an optional body: an empty raw string counts as no document.
    pub fn non_empty(document: Option<Document>) -> Option<Document> {
        match document {
            Some(Document::RawMarkup(markup)) if markup.is_empty() => None,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    #[serde(default, deserialize_with = "nullable")]
    pub root: Root,
}

impl StructuredDocument {
    pub fn new(children: Vec<BlockNode>) -> Self {
        Self {
            root: Root { children },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    #[serde(default, deserialize_with = "lenient_nodes")]
    pub children: Vec<BlockNode>,
}

/// Top-level structural node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockNode {
    Paragraph {
        #[serde(default, deserialize_with = "lenient_nodes")]
        children: Vec<InlineNode>,
    },
    Heading {
        #[serde(default)]
        tag: HeadingTag,
        #[serde(default, deserialize_with = "lenient_nodes")]
        children: Vec<InlineNode>,
    },
    List {
        #[serde(rename = "listType", default)]
        list_type: ListType,
        #[serde(default, deserialize_with = "lenient_nodes")]
        children: Vec<ListItem>,
    },
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingTag {
    H2,
    H3,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Bullet,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(default, deserialize_with = "lenient_nodes")]
    pub children: Vec<InlineNode>,
}

impl ListItem {
    pub fn new(children: Vec<InlineNode>) -> Self {
        Self { children }
    }
}

/// Leaf-level node inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InlineNode {
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(other)]
    Unrecognized,
}

impl InlineNode {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text { text: value.into() }
    }
}

/// Value substituted for a child element that failed to decode.
trait Undecodable {
    fn undecodable() -> Self;
}

impl Undecodable for BlockNode {
    fn undecodable() -> Self {
        BlockNode::Unrecognized
    }
}

impl Undecodable for InlineNode {
    fn undecodable() -> Self {
        InlineNode::Unrecognized
    }
}

impl Undecodable for ListItem {
    fn undecodable() -> Self {
        ListItem::default()
    }
}

fn lenient_nodes<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Undecodable,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap_or_else(|_| T::undecodable()))
        .collect())
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
