//! Translation of `$identifier` templates into native BigQuery SQL.
//!
//! The translator:
//! - replaces `$identifier` placeholders with backtick-quoted, sanitized values
//! - forwards `@named` bindings with the `@` prefix removed
//! - forwards `?` positional bindings unchanged
//!
//! and validates that placeholders and bindings correspond one to one.

use crate::constants::{LOG_SQL_PREVIEW_CHARS, MAX_IDENTIFIER_BYTES};
use crate::error::TranslateError;
use crate::query::binding::{Binding, PlaceholderKind};
use crate::query::types::BindingValue;
use crate::security::{quote_identifier, Occurrence, Placeholders};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// SQL and bindings ready for the execution engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// SQL with every identifier placeholder resolved.
    pub sql: String,

    /// Named bindings (marker stripped) and positional bindings, in their
    /// original relative order.
    pub parameters: Vec<Binding>,
}

impl Translation {
    /// Split into SQL and parameters.
    pub fn into_parts(self) -> (String, Vec<Binding>) {
        (self.sql, self.parameters)
    }
}

/// Bindings sorted by placeholder class.
#[derive(Debug, Default)]
struct ClassifiedBindings<'a> {
    /// `$name` bindings in supplied order.
    identifiers: Vec<(&'a str, &'a BindingValue)>,
    /// `@name` texts in supplied order.
    named: Vec<&'a str>,
    /// Bindings forwarded to the engine.
    forwarded: Vec<Binding>,
    positional: usize,
}

impl<'a> ClassifiedBindings<'a> {
    fn classify(bindings: &'a [Binding]) -> Result<Self, TranslateError> {
        let mut classified = Self::default();
        let mut seen = HashSet::new();

        for binding in bindings {
            let kind = binding.kind()?;
            if kind != PlaceholderKind::Positional && !seen.insert(binding.name.as_str()) {
                return Err(TranslateError::DuplicateParameter {
                    name: binding.name.clone(),
                });
            }

            match kind {
                PlaceholderKind::Identifier => {
                    classified
                        .identifiers
                        .push((binding.name.as_str(), &binding.value));
                }
                PlaceholderKind::Named => {
                    classified.named.push(binding.name.as_str());
                    classified.forwarded.push(binding.stripped());
                }
                PlaceholderKind::Positional => {
                    classified.positional += 1;
                    classified.forwarded.push(binding.clone());
                }
            }
        }

        Ok(classified)
    }

    fn has_named(&self, name: &str) -> bool {
        self.named.contains(&name)
    }

    fn has_identifier(&self, name: &str) -> bool {
        self.identifiers.iter().any(|(n, _)| *n == name)
    }
}

/// Translate a `$identifier` SQL template and its bindings.
///
/// Checks run in a fixed order and the first failure is returned: binding
/// names, unused and missing `@named` parameters, unused and missing
/// `$identifier` parameters, positional counts, then identifier values.
///
/// # Examples
///
/// ```
/// use saferbq::{translate, Binding};
///
/// let out = translate(
///     "SELECT * FROM $dataset.$table WHERE status = @status",
///     &[
///         Binding::identifier("dataset", "mydataset"),
///         Binding::identifier("table", "my-table"),
///         Binding::named("status", "active"),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(out.sql, "SELECT * FROM `mydataset`.`my-table` WHERE status = @status");
/// assert_eq!(out.parameters, vec![Binding::new("status", "active")]);
/// ```
pub fn translate(sql: &str, bindings: &[Binding]) -> Result<Translation, TranslateError> {
    if sql.is_empty() {
        return Err(TranslateError::EmptySql);
    }

    let classified = ClassifiedBindings::classify(bindings)?;
    let found = Placeholders::scan(sql);
    let sql_named = found.distinct_named();
    let sql_identifiers = found.distinct_identifiers();

    if let Some(name) = classified.named.iter().find(|n| !sql_named.contains(n)) {
        return Err(TranslateError::ParameterNotFound {
            name: (*name).to_string(),
        });
    }
    if let Some(name) = sql_named.iter().find(|n| !classified.has_named(n)) {
        return Err(TranslateError::ParameterNotProvided {
            name: (*name).to_string(),
        });
    }
    if let Some((name, _)) = classified
        .identifiers
        .iter()
        .find(|(n, _)| !sql_identifiers.contains(n))
    {
        return Err(TranslateError::IdentifierNotFound {
            name: (*name).to_string(),
        });
    }
    if let Some(name) = sql_identifiers
        .iter()
        .find(|n| !classified.has_identifier(n))
    {
        return Err(TranslateError::IdentifierNotProvided {
            name: (*name).to_string(),
        });
    }

    let found_positional = found.positional;
    let provided = classified.positional;
    if found_positional > provided {
        return Err(TranslateError::NotEnoughPositionalParams {
            found: found_positional,
            provided,
        });
    }
    if found_positional < provided {
        return Err(TranslateError::TooManyPositionalParams {
            found: found_positional,
            provided,
        });
    }

    let mut replacements = HashMap::with_capacity(classified.identifiers.len());
    for (name, value) in &classified.identifiers {
        let quoted = quote_identifier(value);
        if !quoted.is_clean() {
            warn!(
                placeholder = *name,
                value_type = value.type_name(),
                rejected = quoted.rejected().len(),
                "Identifier value rejected"
            );
            return Err(TranslateError::IdentifierInvalidChars {
                name: (*name).to_string(),
                rejected: quoted.rejected_string(),
            });
        }
        if quoted.is_empty() {
            return Err(TranslateError::IdentifierEmpty {
                name: (*name).to_string(),
            });
        }
        if quoted.inner().len() > MAX_IDENTIFIER_BYTES {
            return Err(TranslateError::IdentifierTooLong {
                name: (*name).to_string(),
            });
        }
        replacements.insert(*name, quoted.into_quoted());
    }

    let rewritten = substitute(sql, &found.identifiers, &replacements);

    debug!(
        identifiers = replacements.len(),
        named = classified.named.len(),
        positional = provided,
        "Translated query: {}",
        truncate_for_log(&rewritten, LOG_SQL_PREVIEW_CHARS)
    );

    Ok(Translation {
        sql: rewritten,
        parameters: classified.forwarded,
    })
}

/// Replace each occurrence span with its quoted identifier.
///
/// Works on the spans found during discovery, so a placeholder that is a
/// textual prefix of another (`$table` / `$table1`) is never rewritten
/// inside the longer one.
fn substitute(
    sql: &str,
    occurrences: &[Occurrence<'_>],
    replacements: &HashMap<&str, String>,
) -> String {
    let extra: usize = replacements.values().map(String::len).sum();
    let mut out = String::with_capacity(sql.len() + extra);
    let mut last = 0;

    for occurrence in occurrences {
        out.push_str(&sql[last..occurrence.span.start]);
        match replacements.get(occurrence.text) {
            Some(quoted) => out.push_str(quoted),
            None => out.push_str(occurrence.text),
        }
        last = occurrence.span.end;
    }
    out.push_str(&sql[last..]);

    out
}

/// Truncate a string for logging, respecting char boundaries.
fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}...", &s[..idx]),
    }
}
