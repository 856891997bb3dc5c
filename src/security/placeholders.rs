//! Placeholder discovery in SQL templates.
//!
//! This is a lexical scan, not a SQL parser: placeholders inside string
//! literals or comments are found like any other.

use crate::constants::POSITIONAL_SYMBOL;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

/// Helper to compile the hardcoded placeholder patterns.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|e| panic!("Internal error: invalid regex pattern '{}': {}", pattern, e))
}

/// `$identifier` placeholders.
static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"\$[a-zA-Z_][a-zA-Z0-9_]*"));

/// `@named` placeholders.
static NAMED_PATTERN: Lazy<Regex> = Lazy::new(|| compile(r"@[a-zA-Z_][a-zA-Z0-9_]*"));

/// One placeholder occurrence in the SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'a> {
    /// Placeholder text including its marker.
    pub text: &'a str,
    /// Byte span in the SQL text.
    pub span: Range<usize>,
}

/// All placeholders found in a SQL template.
#[derive(Debug, Clone, Default)]
pub struct Placeholders<'a> {
    /// `$name` occurrences in textual order.
    pub identifiers: Vec<Occurrence<'a>>,
    /// `@name` occurrences in textual order.
    pub named: Vec<Occurrence<'a>>,
    /// Number of `?` symbols.
    pub positional: usize,
}

impl<'a> Placeholders<'a> {
    /// Scan a SQL template.
    pub fn scan(sql: &'a str) -> Self {
        Self {
            identifiers: find_all(&IDENTIFIER_PATTERN, sql),
            named: find_all(&NAMED_PATTERN, sql),
            positional: sql.matches(POSITIONAL_SYMBOL).count(),
        }
    }

    /// Distinct identifier placeholder texts, in order of first appearance.
    pub fn distinct_identifiers(&self) -> Vec<&'a str> {
        distinct(&self.identifiers)
    }

    /// Distinct named placeholder texts, in order of first appearance.
    pub fn distinct_named(&self) -> Vec<&'a str> {
        distinct(&self.named)
    }
}

fn find_all<'a>(pattern: &Regex, sql: &'a str) -> Vec<Occurrence<'a>> {
    pattern
        .find_iter(sql)
        .map(|m| Occurrence {
            text: m.as_str(),
            span: m.range(),
        })
        .collect()
}

fn distinct<'a>(occurrences: &[Occurrence<'a>]) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    occurrences
        .iter()
        .map(|o| o.text)
        .filter(|text| seen.insert(*text))
        .collect()
}
