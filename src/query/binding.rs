//! Query parameter bindings and their placeholder classes.

use crate::constants::{IDENTIFIER_MARKER, NAMED_MARKER};
use crate::error::TranslateError;
use crate::query::types::BindingValue;
use serde::{Deserialize, Serialize};

/// A single supplied query parameter.
///
/// The name decides how the binding is treated: `$name` is an identifier,
/// `@name` a named value and an empty name a positional value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// Placeholder name including its marker, or empty for positional.
    #[serde(default)]
    pub name: String,

    /// Bound value.
    #[serde(default = "null_value")]
    pub value: BindingValue,
}

fn null_value() -> BindingValue {
    BindingValue::Null
}

/// Placeholder class of a binding, derived from its name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// `$name`: resolved into a quoted identifier.
    Identifier,
    /// `@name`: forwarded to the engine with the marker stripped.
    Named,
    /// Empty name: matched by position against `?`.
    Positional,
}

impl Binding {
    /// Create a binding with an explicit name.
    pub fn new(name: impl Into<String>, value: impl Into<BindingValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a positional binding.
    pub fn positional(value: impl Into<BindingValue>) -> Self {
        Self::new(String::new(), value)
    }

    /// Create an identifier binding; `$` is added when missing.
    pub fn identifier(name: &str, value: impl Into<BindingValue>) -> Self {
        Self::new(with_marker(IDENTIFIER_MARKER, name), value)
    }

    /// Create a named binding; `@` is added when missing.
    pub fn named(name: &str, value: impl Into<BindingValue>) -> Self {
        Self::new(with_marker(NAMED_MARKER, name), value)
    }

    /// Classify the binding by its name prefix.
    pub fn kind(&self) -> Result<PlaceholderKind, TranslateError> {
        match self.name.chars().next() {
            None => Ok(PlaceholderKind::Positional),
            Some(IDENTIFIER_MARKER) => Ok(PlaceholderKind::Identifier),
            Some(NAMED_MARKER) => Ok(PlaceholderKind::Named),
            Some(_) => Err(TranslateError::InvalidParameterName {
                name: self.name.clone(),
            }),
        }
    }

    /// The name without its leading marker.
    pub fn bare_name(&self) -> &str {
        self.name
            .strip_prefix([IDENTIFIER_MARKER, NAMED_MARKER])
            .unwrap_or(&self.name)
    }

    /// A copy of this binding with the marker stripped from its name.
    pub(crate) fn stripped(&self) -> Self {
        Self {
            name: self.bare_name().to_string(),
            value: self.value.clone(),
        }
    }
}

fn with_marker(marker: char, name: &str) -> String {
    if name.starts_with(marker) {
        name.to_string()
    } else {
        format!("{marker}{name}")
    }
}
