//! Rule Links
//!
//! Ordered tables mapping validation message shapes to documentation links.

pub mod registry;
pub mod schema;

pub use registry::{
    LoadedRuleTable, RuleTableRegistry, RulesDir, TablePriority, DEFAULT_TABLE,
};
pub use schema::{RuleDef, RuleLinkEntry, RuleLinkTable, RuleTableError, RuleTableFile};
