//! Rule Table Registry
//!
//! Keeps the rule tables known to the tool and picks the one to use.
//!
//! Loading priority: built-in < user-global < workspace < explicit directory.
//! A table loaded later replaces an earlier one with the same name when its
//! priority is at least as high.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::schema::{RuleLinkTable, RuleTableError};

/// Name of the table used when none is requested
pub const DEFAULT_TABLE: &str = "apollo";

const BUILT_IN_TABLES: &[(&str, &str)] = &[
    ("apollo", include_str!("../../resources/rules/apollo.toml")),
    (
        "graphql-js",
        include_str!("../../resources/rules/graphql-js.toml"),
    ),
];

/// Where a rule table was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TablePriority {
    BuiltIn = 0,
    UserGlobal = 1,
    Workspace = 2,
    Explicit = 3,
}

/// A directory to scan for `*.toml` rule tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesDir {
    pub path: PathBuf,
    pub priority: TablePriority,
}

/// A rule table with its source and priority
#[derive(Debug, Clone)]
pub struct LoadedRuleTable {
    pub table: RuleLinkTable,
    pub priority: TablePriority,
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct RuleTableRegistry {
    tables: HashMap<String, LoadedRuleTable>,
}

impl RuleTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the tables embedded in the binary
    pub fn with_built_in() -> Result<Self> {
        let mut registry = Self::new();
        registry.add_built_in_tables()?;
        Ok(registry)
    }

    /// Registry holding the built-in tables plus everything found in `dirs`
    pub async fn load(dirs: &[RulesDir]) -> Result<Self> {
        let mut registry = Self::with_built_in()?;
        for dir in dirs {
            registry.load_directory(&dir.path, dir.priority).await?;
        }
        log::debug!("Loaded {} rule tables", registry.tables.len());
        Ok(registry)
    }

    pub fn add_built_in_tables(&mut self) -> Result<()> {
        for (name, content) in BUILT_IN_TABLES {
            let table = RuleLinkTable::from_toml(content)
                .with_context(|| format!("Failed to parse built-in rule table '{}'", name))?;
            self.add_table(LoadedRuleTable {
                table,
                priority: TablePriority::BuiltIn,
                source_path: None,
            });
        }
        Ok(())
    }

    /// Add a table unless a higher-priority table of the same name is present
    pub fn add_table(&mut self, loaded: LoadedRuleTable) {
        let name = loaded.table.name.clone();
        match self.tables.get(&name) {
            Some(existing) if existing.priority > loaded.priority => {
                log::debug!(
                    "Keeping {:?} rule table '{}' over {:?} one",
                    existing.priority,
                    name,
                    loaded.priority
                );
            }
            _ => {
                self.tables.insert(name, loaded);
            }
        }
    }

    /// Load every `*.toml` table in a directory. Missing directories are not an error.
    pub async fn load_directory(&mut self, dir: &Path, priority: TablePriority) -> Result<usize> {
        if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
            log::debug!("Rule table directory {} does not exist", dir.display());
            return Ok(0);
        }

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("Failed to read rule table directory {}", dir.display()))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        // Deterministic replacement order within one directory
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match load_table_file(&path).await {
                Ok(table) => {
                    log::debug!("Loaded rule table '{}' from {}", table.name, path.display());
                    self.add_table(LoadedRuleTable {
                        table,
                        priority,
                        source_path: Some(path),
                    });
                    loaded += 1;
                }
                Err(e) => {
                    log::warn!("Skipping rule table {}: {:#}", path.display(), e);
                }
            }
        }

        Ok(loaded)
    }

    pub fn get(&self, name: &str) -> Option<&LoadedRuleTable> {
        self.tables.get(name)
    }

    /// Names of all known tables, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Pick a table by file path or by name. Paths win over names.
    pub async fn select(&self, selector: &str) -> Result<RuleLinkTable> {
        let path = Path::new(selector);
        if tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
        {
            return load_table_file(path).await;
        }

        match self.get(selector) {
            Some(loaded) => Ok(loaded.table.clone()),
            None => Err(RuleTableError::UnknownTable {
                name: selector.to_string(),
                available: self.names().into_iter().map(String::from).collect(),
            }
            .into()),
        }
    }
}

async fn load_table_file(path: &Path) -> Result<RuleLinkTable> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read rule table {}", path.display()))?;
    RuleLinkTable::from_toml(&content)
        .with_context(|| format!("Invalid rule table {}", path.display()))
}
