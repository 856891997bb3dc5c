//! BigQuery identifier sanitizing and quoting.
//!
//! Identifiers are wrapped in backticks. Every code point outside the allowed
//! classes is replaced with `_`, so the quote character can never appear
//! inside the quoted form. The allowed classes follow BigQuery's table naming
//! rules: Unicode letters (L), marks (M), numbers (N), connector punctuation
//! (Pc), dashes (Pd) and space separators (Zs), plus `.` as the path
//! separator of a `project.dataset.table` reference.

use crate::constants::{QUOTE_CHAR, REPLACEMENT_CHAR};
use crate::query::BindingValue;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Matches exactly one code point outside the allowed identifier classes.
///
/// Compiled once at first use. The pattern is a hardcoded constant.
static INVALID_IDENTIFIER_CHAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{L}\p{M}\p{N}\p{Pc}\p{Pd}\p{Zs}.]").unwrap_or_else(|e| {
        panic!("Internal error: invalid identifier character pattern: {}", e)
    })
});

/// A sanitized, backtick-quoted identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedIdentifier {
    quoted: String,
    rejected: Vec<char>,
}

impl QuotedIdentifier {
    /// The identifier including its surrounding quotes.
    pub fn quoted(&self) -> &str {
        &self.quoted
    }

    /// The sanitized identifier without its surrounding quotes.
    pub fn inner(&self) -> &str {
        let q = QUOTE_CHAR.len_utf8();
        &self.quoted[q..self.quoted.len() - q]
    }

    /// Distinct rejected code points, in order of first occurrence.
    pub fn rejected(&self) -> &[char] {
        &self.rejected
    }

    /// Rejected code points concatenated, for diagnostics.
    pub fn rejected_string(&self) -> String {
        self.rejected.iter().collect()
    }

    /// True when no code point had to be replaced.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// True when the sanitized identifier is empty.
    pub fn is_empty(&self) -> bool {
        self.inner().is_empty()
    }

    /// Consume into the quoted string.
    pub fn into_quoted(self) -> String {
        self.quoted
    }
}

/// Check whether a single code point may appear in an identifier unchanged.
pub fn is_valid_identifier_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    !INVALID_IDENTIFIER_CHAR.is_match(c.encode_utf8(&mut buf))
}

/// Sanitize and quote a text identifier.
///
/// Never fails: invalid code points are replaced and reported through
/// [`QuotedIdentifier::rejected`].
///
/// # Examples
///
/// ```
/// use saferbq::security::quote_str;
///
/// assert_eq!(quote_str("mytable").quoted(), "`mytable`");
/// assert_eq!(quote_str("my-dataset.my table").quoted(), "`my-dataset.my table`");
///
/// let q = quote_str("mytable`; DROP TABLE");
/// assert_eq!(q.quoted(), "`mytable__ DROP TABLE`");
/// assert_eq!(q.rejected_string(), "`;");
/// ```
pub fn quote_str(text: &str) -> QuotedIdentifier {
    let mut quoted = String::with_capacity(text.len() + 2 * QUOTE_CHAR.len_utf8());
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    quoted.push(QUOTE_CHAR);
    let mut last = 0;
    for m in INVALID_IDENTIFIER_CHAR.find_iter(text) {
        quoted.push_str(&text[last..m.start()]);
        quoted.push(REPLACEMENT_CHAR);
        for c in m.as_str().chars() {
            if seen.insert(c) {
                rejected.push(c);
            }
        }
        last = m.end();
    }
    quoted.push_str(&text[last..]);
    quoted.push(QUOTE_CHAR);

    QuotedIdentifier { quoted, rejected }
}

/// Sanitize and quote any binding value as an identifier.
///
/// Non-string values are quoted through their canonical text; `Null`
/// yields an empty quoted pair.
pub fn quote_identifier(value: &BindingValue) -> QuotedIdentifier {
    match value {
        BindingValue::String(s) => quote_str(s),
        other => quote_str(&other.to_canonical_text()),
    }
}
