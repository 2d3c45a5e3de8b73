//! GraphQL Operations Validator
//!
//! Validates GraphQL operation documents against a schema and prints
//! human-readable diagnostics linked to a rule guide.
//!
//! This library provides:
//! - Schema loading from files, introspection JSON and remote endpoints
//! - Operation loading from `.graphql` files and embedded code templates
//! - Rule tables mapping validation messages to documentation links
//! - Diagnostic formatting and the validation driver

pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod loader;
pub mod rules;
pub mod validation;

// Re-exports for clean public API
pub use config::Config;
pub use diagnostics::{DiagnosticFormatter, LinkStyle};
pub use driver::{report, run, RunSummary};
pub use loader::{Document, DocumentLoader, SchemaLoader};
pub use rules::{RuleLinkEntry, RuleLinkTable, RuleTableRegistry};
pub use validation::{ApolloValidator, SourceLocation, ValidationError, Validator};
