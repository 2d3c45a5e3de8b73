//! Validation Engine
//!
//! Clean separation of validation from loading and reporting.

pub mod engine;

pub use engine::{ApolloValidator, SourceLocation, ValidationError, Validator};
