//! Configuration management for the operation validator.
//!
//! Handles:
//! - Command-line argument parsing
//! - Rule table directory configuration
//! - Output options (links, colors)

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use crate::diagnostics::LinkStyle;
use crate::rules::{RulesDir, TablePriority, DEFAULT_TABLE};

/// Directory name used under the user config dir and in the workspace
const APP_DIR: &str = "validate-operations";

/// Command-line arguments for the operation validator
#[derive(Debug, Parser)]
#[command(name = "validate-operations")]
#[command(about = "CLI to validate GraphQL operations against a schema")]
#[command(version)]
pub struct Args {
    /// Schema location
    #[arg(
        short,
        long,
        help = "Path to the schema file or URL to fetch the schema from"
    )]
    pub schema: String,

    /// Operation documents to validate
    #[arg(
        short,
        long,
        default_value = "**/*.graphql",
        help = "Path to the operation files"
    )]
    pub operation: String,

    /// Extra HTTP headers for remote schemas
    #[arg(
        short = 'H',
        long = "header",
        value_name = "NAME: VALUE",
        help = "HTTP header sent when fetching a remote schema (repeatable)"
    )]
    pub headers: Vec<String>,

    /// Rule table used to link diagnostics to documentation
    #[arg(
        long,
        default_value = DEFAULT_TABLE,
        help = "Rule table name or path to a rule table TOML file"
    )]
    pub rules: String,

    /// Custom rule table directory
    #[arg(long, help = "Directory containing rule table TOML files")]
    pub rules_dir: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value_t = When::Auto,
        help = "Render documentation links as terminal hyperlinks"
    )]
    pub links: When,

    #[arg(long, value_enum, default_value_t = When::Auto, help = "Colorize output")]
    pub color: When,

    /// Log level when RUST_LOG is not set
    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum When {
    Auto,
    Always,
    Never,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: String,
    pub operation: String,
    /// Parsed `NAME: VALUE` headers, in command-line order
    pub headers: Vec<(String, String)>,
    pub rules: String,
    /// Rule table directories, lowest priority first
    pub rules_dirs: Vec<RulesDir>,
    pub links: When,
    pub color: When,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let headers = args
            .headers
            .iter()
            .map(|header| parse_header(header))
            .collect::<Result<Vec<_>>>()?;

        let mut rules_dirs = Vec::new();

        // User config directory: ~/.config/validate-operations/rules/
        if let Some(config_dir) = dirs::config_dir() {
            rules_dirs.push(RulesDir {
                path: config_dir.join(APP_DIR).join("rules"),
                priority: TablePriority::UserGlobal,
            });
        }

        // Current workspace directory: ./.validate-operations/rules/
        rules_dirs.push(RulesDir {
            path: PathBuf::from(format!(".{APP_DIR}")).join("rules"),
            priority: TablePriority::Workspace,
        });

        if let Some(custom_dir) = args.rules_dir {
            rules_dirs.push(RulesDir {
                path: custom_dir,
                priority: TablePriority::Explicit,
            });
        }

        Ok(Config {
            schema: args.schema,
            operation: args.operation,
            headers,
            rules: args.rules,
            rules_dirs,
            links: args.links,
            color: args.color,
            log_level: args.log_level,
        })
    }

    /// Link rendering for the current stdout
    pub fn link_style(&self) -> LinkStyle {
        match self.links {
            When::Always => LinkStyle::Hyperlink,
            When::Never => LinkStyle::Plain,
            When::Auto => LinkStyle::detect(
                std::io::stdout().is_terminal(),
                std::env::var("TERM").ok().as_deref(),
            ),
        }
    }

    /// Whether colors are requested at all. In `auto` mode the terminal
    /// checks of `colored` still apply.
    pub fn use_color(&self) -> bool {
        self.color != When::Never
    }
}

/// Parse a `NAME: VALUE` header argument
pub fn parse_header(header: &str) -> Result<(String, String)> {
    match header.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => bail!("Invalid header '{}', expected 'NAME: VALUE'", header),
    }
}
