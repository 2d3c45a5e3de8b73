//! Validation Driver
//!
//! Loads the rule table, the schema and the documents, then reports the
//! validation result of each document in order.

use std::io::Write;

use anyhow::Result;

use crate::config::Config;
use crate::diagnostics::DiagnosticFormatter;
use crate::loader::{Document, DocumentLoader, SchemaLoader, SchemaSource};
use crate::rules::RuleTableRegistry;
use crate::validation::{ApolloValidator, Validator};

/// Counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub documents: usize,
    pub valid_documents: usize,
    pub errors: usize,
    /// Printed diagnostics, one per error location
    pub diagnostics: usize,
}

/// Run a full validation as configured, writing the report to `out`.
///
/// Load failures are returned as errors. Validation errors are part of the
/// report and never fail the run.
pub async fn run<W: Write>(config: &Config, out: &mut W) -> Result<RunSummary> {
    let registry = RuleTableRegistry::load(&config.rules_dirs).await?;
    let table = registry.select(&config.rules).await?;
    log::debug!("Using rule table '{}' ({} rules)", table.name, table.len());

    let schema = SchemaLoader::new(&config.headers)?
        .load(&config.schema)
        .await?;

    let mut documents = DocumentLoader::new(".");
    if let Some(path) = SchemaSource::detect(&config.schema)?.local_path() {
        documents = documents.exclude(path);
    }
    let documents = documents.load(&config.operation).await?;

    let validator = ApolloValidator::new(schema);
    let formatter = DiagnosticFormatter::new(&table)
        .with_link_style(config.link_style())
        .with_color(config.use_color());

    report(&validator, &documents, &config.operation, &formatter, out)
}

/// Validate each document and write its diagnostics, or a success line when
/// it has none.
pub fn report<V, W>(
    validator: &V,
    documents: &[Document],
    pointer: &str,
    formatter: &DiagnosticFormatter<'_>,
    out: &mut W,
) -> Result<RunSummary>
where
    V: Validator + ?Sized,
    W: Write,
{
    let mut summary = RunSummary::default();

    for document in documents {
        summary.documents += 1;
        let errors = validator.validate(document);

        if errors.is_empty() {
            summary.valid_documents += 1;
            writeln!(out, "{}", formatter.format_success(pointer))?;
            continue;
        }

        for error in &errors {
            summary.errors += 1;
            if error.locations.is_empty() {
                log::warn!(
                    "{}: error without a location: {}",
                    document.location,
                    error.message
                );
            }
            for location in &error.locations {
                let text = formatter.format(&document.location, *location, error);
                writeln!(out, "{}\n", text)?;
                summary.diagnostics += 1;
            }
        }
    }

    log::info!(
        "Validated {} documents: {} valid, {} errors",
        summary.documents,
        summary.valid_documents,
        summary.errors
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::rules::{RuleLinkEntry, RuleLinkTable};
    use crate::validation::ValidationError;

    /// Returns canned errors per document location
    struct FixedValidator(HashMap<String, Vec<ValidationError>>);

    impl Validator for FixedValidator {
        fn validate(&self, document: &Document) -> Vec<ValidationError> {
            self.0.get(&document.location).cloned().unwrap_or_default()
        }
    }

    fn document(location: &str) -> Document {
        Document {
            location: location.to_string(),
            source: String::new(),
        }
    }

    fn table() -> RuleLinkTable {
        RuleLinkTable::new(
            "test",
            vec![RuleLinkEntry::new("Unknown type", "https://example.com/#types").unwrap()],
        )
    }

    #[test]
    fn test_valid_document_prints_one_success_line() {
        let table = table();
        let formatter = DiagnosticFormatter::new(&table);
        let validator = FixedValidator(HashMap::new());
        let mut out = Vec::new();

        let summary = report(
            &validator,
            &[document("a.graphql")],
            "**/*.graphql",
            &formatter,
            &mut out,
        )
        .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert_eq!(
            output,
            "✔ Awesome! All operations in **/*.graphql are valid!\n"
        );
        assert_eq!(summary.valid_documents, 1);
        assert_eq!(summary.diagnostics, 0);
    }

    #[test]
    fn test_one_diagnostic_per_location_in_order() {
        let table = table();
        let formatter = DiagnosticFormatter::new(&table);
        let validator = FixedValidator(HashMap::from([(
            "b.graphql".to_string(),
            vec![
                ValidationError::new("Unknown type \"A\"").at(1, 1).at(2, 2),
                ValidationError::new("no locations"),
                ValidationError::new("other").at(3, 3),
            ],
        )]));
        let mut out = Vec::new();

        let summary = report(
            &validator,
            &[document("b.graphql")],
            "**/*.graphql",
            &formatter,
            &mut out,
        )
        .unwrap();

        assert_eq!(summary.errors, 3);
        assert_eq!(summary.diagnostics, 3);

        let output = String::from_utf8(out).unwrap();
        let positions: Vec<&str> = output
            .lines()
            .filter(|line| line.starts_with("  b.graphql#"))
            .map(str::trim)
            .collect();
        assert_eq!(
            positions,
            vec!["b.graphql#1:1", "b.graphql#2:2", "b.graphql#3:3"]
        );
        assert_eq!(output.matches("More information at").count(), 2);
        assert!(!output.contains("Awesome"));
    }

    #[test]
    fn test_no_documents_no_output() {
        let table = table();
        let formatter = DiagnosticFormatter::new(&table);
        let validator = FixedValidator(HashMap::new());
        let mut out = Vec::new();

        let summary = report(&validator, &[], "**/*.graphql", &formatter, &mut out).unwrap();

        assert!(out.is_empty());
        assert_eq!(summary, RunSummary::default());
    }
}
