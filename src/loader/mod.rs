//! Loaders
//!
//! Schema and operation document loading from files, globs and URLs.

pub mod documents;
pub mod introspection;
pub mod pluck;
pub mod schema;

pub use documents::{Document, DocumentKind, DocumentLoader};
pub use schema::{build_schema, SchemaLoader, SchemaSource};
