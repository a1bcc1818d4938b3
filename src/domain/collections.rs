//! Declarative schemas for the CMS collections this page consumes.
//!
//! Storage lives in the content service; these definitions describe the record
//! shapes and access rules the service enforces, and are used here to validate
//! records before they are decoded.

use std::fmt::{Display, Formatter};

use serde_json::{Map, Value};
use slug::slugify;

use super::error::DomainError;

pub const CONTENT_SLUG: &str = "content";
pub const CATEGORIES_SLUG: &str = "categories";
pub const DEFAULT_CONTENT_SLUG: &str = "homepage-content";

/// Operation requested against a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller identity as seen by the content service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated { user_id: String },
}

impl Principal {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    Public,
    Authenticated,
}

impl AccessRule {
    pub fn allows(self, principal: &Principal) -> bool {
        match self {
            Self::Public => true,
            Self::Authenticated => principal.is_authenticated(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub read: AccessRule,
    pub create: AccessRule,
    pub update: AccessRule,
    pub delete: AccessRule,
}

impl AccessPolicy {
    /// Public reads, authenticated writes.
    pub const fn public_read() -> Self {
        Self {
            read: AccessRule::Public,
            create: AccessRule::Authenticated,
            update: AccessRule::Authenticated,
            delete: AccessRule::Authenticated,
        }
    }

    pub fn permits(&self, operation: Operation, principal: &Principal) -> bool {
        let rule = match operation {
            Operation::Read => self.read,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        };
        rule.allows(principal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    RichText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    pub default: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl FieldSpec {
    const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
            unique: false,
            default: None,
            description: None,
        }
    }

    const fn rich_text(name: &'static str) -> Self {
        Self {
            kind: FieldKind::RichText,
            ..Self::text(name)
        }
    }

    const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    const fn default_value(self, value: &'static str) -> Self {
        Self {
            default: Some(value),
            ..self
        }
    }

    const fn describe(self, description: &'static str) -> Self {
        Self {
            description: Some(description),
            ..self
        }
    }

    fn enforces_presence(&self) -> bool {
        self.required && self.default.is_none() && self.kind != FieldKind::RichText
    }

    fn is_slug(&self) -> bool {
        self.name == "slug"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSchema {
    pub slug: &'static str,
    pub fields: Vec<FieldSpec>,
    pub access: AccessPolicy,
    /// Upload collections carry a resolvable `url` on every record.
    pub upload: bool,
    pub use_as_title: Option<&'static str>,
    pub default_columns: Vec<&'static str>,
}

impl CollectionSchema {
    /// Structured page content.
    pub fn content() -> Self {
        Self {
            slug: CONTENT_SLUG,
            fields: vec![
                FieldSpec::text("title")
                    .required()
                    .describe("The title of the content"),
                FieldSpec::rich_text("body")
                    .required()
                    .describe("The main content body"),
                FieldSpec::text("slug")
                    .required()
                    .unique()
                    .default_value(DEFAULT_CONTENT_SLUG)
                    .describe("Unique identifier for this content (e.g., \"homepage-content\")"),
            ],
            access: AccessPolicy::public_read(),
            upload: false,
            use_as_title: Some("title"),
            default_columns: vec!["title", "updatedAt"],
        }
    }

    pub fn categories() -> Self {
        Self {
            slug: CATEGORIES_SLUG,
            fields: vec![
                FieldSpec::text("title").required(),
                FieldSpec::text("slug")
                    .required()
                    .unique()
                    .describe("The slug of the category"),
            ],
            access: AccessPolicy::public_read(),
            upload: true,
            use_as_title: None,
            default_columns: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn permits(&self, operation: Operation, principal: &Principal) -> bool {
        self.access.permits(operation, principal)
    }

    /// Check a record against the field definitions.
    ///
    /// Fields with a default satisfy `required` when absent; run
    /// [`CollectionSchema::apply_defaults`] to materialise them. Rich-text
    /// fields are only checked for shape: an absent body is rendered as
    /// fallback markup rather than rejected.
    pub fn validate(&self, record: &Value) -> Result<(), DomainError> {
        let object = record.as_object().ok_or_else(|| {
            DomainError::validation(format!("{} record must be a JSON object", self.slug))
        })?;

        for field in &self.fields {
            match object.get(field.name) {
                None | Some(Value::Null) => {
                    if field.enforces_presence() {
                        return Err(DomainError::validation(format!(
                            "{}.{} is required",
                            self.slug, field.name
                        )));
                    }
                }
                Some(value) => self.validate_value(field, value)?,
            }
        }

        Ok(())
    }

    fn validate_value(&self, field: &FieldSpec, value: &Value) -> Result<(), DomainError> {
        match (field.kind, value) {
            (FieldKind::Text, Value::String(text)) => {
                if field.is_slug() && slugify(text).is_empty() {
                    return Err(DomainError::validation(format!(
                        "{}.{} must contain at least one slug character",
                        self.slug, field.name
                    )));
                }
                Ok(())
            }
            (FieldKind::RichText, Value::String(_) | Value::Object(_)) => Ok(()),
            (FieldKind::Text, _) => Err(DomainError::validation(format!(
                "{}.{} must be text",
                self.slug, field.name
            ))),
            (FieldKind::RichText, _) => Err(DomainError::validation(format!(
                "{}.{} must be markup or a rich-text tree",
                self.slug, field.name
            ))),
        }
    }

    /// Fill absent or null fields that declare a default value.
    pub fn apply_defaults(&self, record: &mut Map<String, Value>) {
        for field in &self.fields {
            let Some(default) = field.default else {
                continue;
            };
            let missing = matches!(record.get(field.name), None | Some(Value::Null));
            if missing {
                record.insert(field.name.to_string(), Value::String(default.to_string()));
            }
        }
    }
}
