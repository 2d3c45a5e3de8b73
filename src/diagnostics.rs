//! Diagnostic formatting
//!
//! Turns validation errors into the text printed for each error location.

use colored::Colorize;

use crate::rules::{RuleLinkEntry, RuleLinkTable};
use crate::validation::{SourceLocation, ValidationError};

/// How resolved documentation links are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// The URL as text
    #[default]
    Plain,
    /// An OSC 8 terminal hyperlink labelled with the rule name
    Hyperlink,
}

impl LinkStyle {
    /// Hyperlinks only make sense on a terminal that renders them
    pub fn detect(is_terminal: bool, term: Option<&str>) -> Self {
        if is_terminal && term != Some("dumb") {
            Self::Hyperlink
        } else {
            Self::Plain
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticFormatter<'t> {
    table: &'t RuleLinkTable,
    link_style: LinkStyle,
    color: bool,
}

impl<'t> DiagnosticFormatter<'t> {
    pub fn new(table: &'t RuleLinkTable) -> Self {
        Self {
            table,
            link_style: LinkStyle::Plain,
            color: false,
        }
    }

    pub fn with_link_style(mut self, link_style: LinkStyle) -> Self {
        self.link_style = link_style;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Text for one location of one error:
    ///
    /// ```text
    /// <message>
    ///   <document>#<line>:<column>
    ///   More information at <link>
    /// ```
    ///
    /// The last line is only present when the message matches a rule.
    pub fn format(
        &self,
        document_id: &str,
        location: SourceLocation,
        error: &ValidationError,
    ) -> String {
        let position = format!("{}#{}:{}", document_id, location.line, location.column);

        let mut out = if self.color {
            format!("{}\n  {}", error.message.red(), position.yellow())
        } else {
            format!("{}\n  {}", error.message, position)
        };

        if let Some(entry) = self.table.resolve(&error.message) {
            out.push_str("\n  More information at ");
            out.push_str(&self.render_link(entry));
        }

        out
    }

    /// Line printed for a document without errors
    pub fn format_success(&self, pointer: &str) -> String {
        let line = format!("✔ Awesome! All operations in {} are valid!", pointer);
        if self.color {
            line.green().to_string()
        } else {
            line
        }
    }

    fn render_link(&self, entry: &RuleLinkEntry) -> String {
        match self.link_style {
            LinkStyle::Plain => entry.link.clone(),
            LinkStyle::Hyperlink => hyperlink(&entry.link, entry.label()),
        }
    }
}

fn hyperlink(url: &str, label: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\{label}\x1b]8;;\x1b\\")
}
