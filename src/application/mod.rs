//! Application services: content resolution, rendering and page assembly.

pub mod error;
pub mod page;
pub mod render;
pub mod resolver;
pub mod source;
