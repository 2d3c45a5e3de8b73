//! Embedded operation extraction
//!
//! Finds GraphQL documents embedded in JavaScript-family source files:
//!
//! - tagged templates: gql`...`, graphql`...`
//! - calls with a template argument: gql(`...`), graphql(`...`)
//! - magic comments: /* GraphQL */ `...`
//!
//! Extracted blocks keep their original line and column so that locations
//! reported by the validator point into the source file.

use std::sync::LazyLock;

use regex::Regex;

static TEMPLATE_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\b(?:gql|graphql)\s*(?:\(\s*)?|/\*\s*GraphQL\s*\*/\s*)`")
        .expect("template start pattern is valid")
});

/// A GraphQL block found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedBlock {
    /// 0-based line of the first character of the block
    pub line: usize,
    /// 0-based column (in chars) of the first character of the block
    pub column: usize,
    pub text: String,
}

/// Extract all embedded GraphQL blocks in source order
pub fn extract_blocks(source: &str) -> Vec<EmbeddedBlock> {
    let mut blocks = Vec::new();
    let mut search_from = 0;

    while let Some(found) = TEMPLATE_START.find_at(source, search_from) {
        let body_start = found.end();
        match read_template(&source[body_start..]) {
            Some((text, consumed)) => {
                let (line, column) = position_of(source, body_start);
                blocks.push(EmbeddedBlock { line, column, text });
                search_from = body_start + consumed;
            }
            None => {
                log::debug!("Unterminated template literal at byte {}", body_start);
                break;
            }
        }
    }

    blocks
}

impl EmbeddedBlock {
    /// The block text preceded by the lines and columns before it in the
    /// source file
    pub fn positioned(&self) -> String {
        let mut out = String::with_capacity(self.line + self.column + self.text.len());
        out.extend(std::iter::repeat_n('\n', self.line));
        out.extend(std::iter::repeat_n(' ', self.column));
        out.push_str(&self.text);
        out
    }
}

/// One document source per non-empty embedded block, in source order
pub fn pluck(source: &str) -> Vec<String> {
    extract_blocks(source)
        .iter()
        .filter(|block| !block.text.trim().is_empty())
        .map(EmbeddedBlock::positioned)
        .collect()
}

/// Read a template literal body up to the closing backtick.
///
/// Returns the body with `${...}` interpolations blanked out (newlines kept)
/// and the number of bytes consumed including the closing backtick.
fn read_template(rest: &str) -> Option<(String, usize)> {
    let mut text = String::new();
    let mut chars = rest.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '`' => return Some((text, idx + 1)),
            '\\' => {
                text.push(' ');
                if let Some((_, escaped)) = chars.next() {
                    text.push(escaped);
                }
            }
            '$' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                text.push_str("  ");
                let mut depth = 1;
                for (_, inner) in chars.by_ref() {
                    match inner {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    text.push(if inner == '\n' { '\n' } else { ' ' });
                    if depth == 0 {
                        break;
                    }
                }
            }
            _ => text.push(ch),
        }
    }

    None
}

fn position_of(source: &str, byte_offset: usize) -> (usize, usize) {
    let before = &source[..byte_offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count();
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tagged_templates() {
        let source = r#"import { gql } from "@apollo/client";

export const GET_USER = gql`
  query GetUser($id: ID!) {
    user(id: $id) { id }
  }
`;

const other = graphql(`query Other { users { id } }`);
const magic = /* GraphQL */ `query Magic { users { name } }`;
"#;

        let blocks = extract_blocks(source);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].line, 2);
        assert!(blocks[0].text.contains("query GetUser"));
        assert_eq!(blocks[1].text, "query Other { users { id } }");
        assert_eq!(blocks[2].text, "query Magic { users { name } }");
    }

    #[test]
    fn test_pluck_keeps_positions() {
        let source = "const a = 1;\nconst q = gql`query A { a }`;\n";
        let plucked = pluck(source);
        assert_eq!(plucked.len(), 1);

        let lines: Vec<&str> = plucked[0].lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1].find("query"), source.lines().nth(1).unwrap().find("query"));
    }

    #[test]
    fn test_interpolations_are_blanked() {
        let source = "gql`\n  query Q { ...F }\n  ${FRAGMENT}\n`";
        let block = &extract_blocks(source)[0];
        assert!(!block.text.contains("FRAGMENT"));
        assert_eq!(block.text.lines().count(), source.lines().count() - 1);
    }

    #[test]
    fn test_no_graphql() {
        assert!(pluck("export const answer = 42;").is_empty());
        assert!(pluck("const empty = gql``;").is_empty());
    }

    #[test]
    fn test_unterminated_template() {
        assert!(extract_blocks("const q = gql`query Q { a }").is_empty());
    }

    #[test]
    fn test_each_block_is_its_own_document() {
        let plucked = pluck("const A = gql`{ a }`;\nconst B = gql`{ b }`;");

        assert_eq!(plucked, vec!["              { a }", "\n              { b }"]);
    }

    #[test]
    fn test_blocks_on_same_line() {
        let plucked = pluck("f(gql`query A { a }`, gql`query B { b }`)");

        assert_eq!(plucked.len(), 2);
        assert_eq!(plucked[0].trim(), "query A { a }");
        assert_eq!(plucked[1].trim(), "query B { b }");
        assert_eq!(plucked[1].find("query"), Some(26));
    }
}
