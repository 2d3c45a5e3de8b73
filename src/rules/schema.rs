//! Rule Table Schema Types
//!
//! Serde types for rule table files and the compiled runtime table.

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Root rule table file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleTableFile {
    pub table: RuleTableMeta,
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

/// Rule table metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleTableMeta {
    pub name: String,
    pub description: Option<String>,
}

/// A single rule as written in a table file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleDef {
    /// Name of the validation rule, used as the hyperlink label
    pub rule: Option<String>,
    pub pattern: String,
    pub link: String,
}

/// Errors raised while building a rule table
#[derive(Debug, Error)]
pub enum RuleTableError {
    #[error("invalid pattern for rule #{index} ('{pattern}') in table '{table}': {source}")]
    InvalidPattern {
        table: String,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("failed to parse rule table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown rule table '{name}' (available: {})", .available.join(", "))]
    UnknownTable { name: String, available: Vec<String> },
}

/// One compiled (pattern, link) pair
#[derive(Debug, Clone)]
pub struct RuleLinkEntry {
    pub rule: Option<String>,
    pub pattern: Regex,
    pub link: String,
}

impl RuleLinkEntry {
    pub fn new(pattern: &str, link: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            rule: None,
            pattern: Regex::new(pattern)?,
            link: link.into(),
        })
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Partial, unanchored match against a diagnostic message
    pub fn matches(&self, message: &str) -> bool {
        self.pattern.is_match(message)
    }

    /// Text shown for the link when it is rendered as a hyperlink
    pub fn label(&self) -> &str {
        self.rule.as_deref().unwrap_or(&self.link)
    }
}

/// Ordered, immutable table of rule links. First match wins.
#[derive(Debug, Clone, Default)]
pub struct RuleLinkTable {
    pub name: String,
    pub description: Option<String>,
    entries: Vec<RuleLinkEntry>,
}

impl RuleLinkTable {
    pub fn new(name: impl Into<String>, entries: Vec<RuleLinkEntry>) -> Self {
        Self {
            name: name.into(),
            description: None,
            entries,
        }
    }

    /// Parse and compile a table from TOML source
    pub fn from_toml(content: &str) -> Result<Self, RuleTableError> {
        let file: RuleTableFile = toml::from_str(content)?;
        Self::try_from(file)
    }

    pub fn entries(&self) -> &[RuleLinkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the first entry whose pattern matches `message`
    pub fn resolve(&self, message: &str) -> Option<&RuleLinkEntry> {
        self.entries.iter().find(|entry| entry.matches(message))
    }

    /// Link of the first entry whose pattern matches `message`
    pub fn resolve_link(&self, message: &str) -> Option<&str> {
        self.resolve(message).map(|entry| entry.link.as_str())
    }
}

impl TryFrom<RuleTableFile> for RuleLinkTable {
    type Error = RuleTableError;

    fn try_from(file: RuleTableFile) -> Result<Self, Self::Error> {
        let table = file.table.name;

        // Declaration order is significant, keep it as written
        let entries = file
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, def)| -> Result<RuleLinkEntry, RuleTableError> {
                let pattern =
                    Regex::new(&def.pattern).map_err(|source| RuleTableError::InvalidPattern {
                        table: table.clone(),
                        index,
                        pattern: def.pattern.clone(),
                        source,
                    })?;
                Ok(RuleLinkEntry {
                    rule: def.rule,
                    pattern,
                    link: def.link,
                })
            })
            .collect::<Result<Vec<_>, RuleTableError>>()?;

        Ok(Self {
            name: table,
            description: file.table.description,
            entries,
        })
    }
}
