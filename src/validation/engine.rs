//! Validation Engine
//!
//! Adapter between operation documents and the GraphQL validation engine.

use apollo_compiler::validation::Valid;
use apollo_compiler::{ExecutableDocument, Schema};

use crate::loader::Document;

/// A 1-based position in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

/// A validation diagnostic for a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    pub locations: Vec<SourceLocation>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.locations.push(SourceLocation { line, column });
        self
    }
}

/// Checks a document and returns its errors in engine order.
/// An empty list means the document is valid.
pub trait Validator {
    fn validate(&self, document: &Document) -> Vec<ValidationError>;
}

/// Validator backed by apollo-compiler
#[derive(Debug, Clone)]
pub struct ApolloValidator {
    schema: Valid<Schema>,
}

impl ApolloValidator {
    pub fn new(schema: Valid<Schema>) -> Self {
        Self { schema }
    }
}

impl Validator for ApolloValidator {
    fn validate(&self, document: &Document) -> Vec<ValidationError> {
        match ExecutableDocument::parse_and_validate(
            &self.schema,
            document.source.as_str(),
            document.location.as_str(),
        ) {
            Ok(_) => Vec::new(),
            // Syntax errors are reported like any other diagnostic
            Err(invalid) => invalid
                .errors
                .iter()
                .map(|diagnostic| {
                    let error = diagnostic.to_json();
                    ValidationError {
                        message: error.message,
                        locations: error
                            .locations
                            .iter()
                            .map(|location| SourceLocation {
                                line: location.line,
                                column: location.column,
                            })
                            .collect(),
                    }
                })
                .collect(),
        }
    }
}
