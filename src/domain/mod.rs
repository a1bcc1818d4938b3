//! Domain layer types and invariants.

pub mod category;
pub mod collections;
pub mod content;
pub mod document;
pub mod error;
