//! Error types for saferbq.
//!
//! [`TranslateError`] covers every validation failure of the translator.
//! [`Error`] is the crate-level error that also carries execution and
//! configuration failures from the surrounding layers.

use thiserror::Error;

/// Validation errors raised while translating a SQL template.
///
/// All of them are deterministic functions of the SQL text and the supplied
/// bindings: fix the template or the bindings, retrying unchanged never helps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The SQL template is empty.
    #[error("query SQL cannot be empty")]
    EmptySql,

    /// A binding name is non-empty but starts with neither `@` nor `$`.
    #[error("invalid parameter name: {name} must start with @ or $")]
    InvalidParameterName { name: String },

    /// The same `@name` or `$name` was supplied more than once.
    #[error("duplicate parameter: {name}")]
    DuplicateParameter { name: String },

    /// A supplied `@name` binding is not referenced by the SQL.
    #[error("parameter not found in query: {name}")]
    ParameterNotFound { name: String },

    /// An `@name` placeholder in the SQL has no binding.
    #[error("parameter not provided in parameters: {name}")]
    ParameterNotProvided { name: String },

    /// A supplied `$name` binding is not referenced by the SQL.
    #[error("identifier not found in query: {name}")]
    IdentifierNotFound { name: String },

    /// A `$name` placeholder in the SQL has no binding.
    #[error("identifier not provided in parameters: {name}")]
    IdentifierNotProvided { name: String },

    /// The SQL holds more `?` symbols than positional bindings were supplied.
    #[error("not enough positional parameters: found {found}, provided {provided}")]
    NotEnoughPositionalParams { found: usize, provided: usize },

    /// More positional bindings were supplied than `?` symbols in the SQL.
    #[error("too many positional parameters: found {found}, provided {provided}")]
    TooManyPositionalParams { found: usize, provided: usize },

    /// The identifier value is empty.
    #[error("identifier is empty: {name}")]
    IdentifierEmpty { name: String },

    /// The identifier value exceeds the maximum byte length.
    #[error("identifier is too long: {name}")]
    IdentifierTooLong { name: String },

    /// The identifier value holds characters outside the allowed classes.
    #[error("identifier contains invalid characters: {name} contains {rejected}")]
    IdentifierInvalidChars { name: String, rejected: String },
}

impl TranslateError {
    /// The placeholder or binding name the error refers to, if any.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::EmptySql
            | Self::NotEnoughPositionalParams { .. }
            | Self::TooManyPositionalParams { .. } => None,
            Self::InvalidParameterName { name }
            | Self::DuplicateParameter { name }
            | Self::ParameterNotFound { name }
            | Self::ParameterNotProvided { name }
            | Self::IdentifierNotFound { name }
            | Self::IdentifierNotProvided { name }
            | Self::IdentifierEmpty { name }
            | Self::IdentifierTooLong { name }
            | Self::IdentifierInvalidChars { name, .. } => Some(name),
        }
    }

    /// Translation errors never succeed on retry.
    pub fn is_transient(&self) -> bool {
        false
    }

    /// Get a user-friendly suggestion for how to fix this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::EmptySql => "Provide a non-empty SQL template",
            Self::InvalidParameterName { .. } => {
                "Prefix identifier bindings with $ and value bindings with @, or leave the name empty for ?"
            }
            Self::DuplicateParameter { .. } => "Supply each named binding exactly once",
            Self::ParameterNotFound { .. } | Self::IdentifierNotFound { .. } => {
                "Remove the unused binding or reference it in the SQL"
            }
            Self::ParameterNotProvided { .. } | Self::IdentifierNotProvided { .. } => {
                "Add a binding for every placeholder in the SQL"
            }
            Self::NotEnoughPositionalParams { .. } | Self::TooManyPositionalParams { .. } => {
                "Supply exactly one unnamed binding per ? in the SQL"
            }
            Self::IdentifierEmpty { .. } => "Identifier values must not be empty",
            Self::IdentifierTooLong { .. } => "Identifier values are limited to 1024 bytes",
            Self::IdentifierInvalidChars { .. } => {
                "Identifiers may only contain letters, marks, numbers, underscores, dashes, spaces and dots"
            }
        }
    }
}

/// Crate-level errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Template validation failed.
    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// The execution client rejected the translated query.
    #[error("Query execution error: {message}")]
    Execution {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A translated result could not be encoded for output
    #[error("Encoding error: {0}")]
    Encode(String),
}

impl Error {
    /// Create an execution error with a source.
    pub fn execution_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Execution {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an output encoding error.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// The underlying translation error, if this is one.
    pub fn as_translate(&self) -> Option<&TranslateError> {
        match self {
            Self::Translate(e) => Some(e),
            _ => None,
        }
    }

    /// Check if this error is transient and may succeed on retry.
    ///
    /// Execution failures are opaque here; the execution client knows whether
    /// its own error is retryable and is the one to decide.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Translate(e) => e.is_transient(),
            Self::Execution { .. } | Self::Config(_) | Self::InvalidInput(_) => false,
            Self::Encode(_) => false,
        }
    }

    /// Get a user-friendly suggestion for how to fix this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Translate(e) => Some(e.suggestion()),
            Self::Config(_) => Some("Check your SAFERBQ_* environment variables"),
            Self::InvalidInput(_) => {
                Some("Pass a JSON object with \"sql\" and \"parameters\" fields")
            }
            Self::Execution { .. } | Self::Encode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_error_messages() {
        assert_eq!(TranslateError::EmptySql.to_string(), "query SQL cannot be empty");
        assert_eq!(
            TranslateError::InvalidParameterName {
                name: "corpus".to_string()
            }
            .to_string(),
            "invalid parameter name: corpus must start with @ or $"
        );
        assert_eq!(
            TranslateError::NotEnoughPositionalParams {
                found: 2,
                provided: 1
            }
            .to_string(),
            "not enough positional parameters: found 2, provided 1"
        );
        assert_eq!(
            TranslateError::IdentifierInvalidChars {
                name: "$table".to_string(),
                rejected: "`;".to_string()
            }
            .to_string(),
            "identifier contains invalid characters: $table contains `;"
        );
    }

    #[test]
    fn test_placeholder_accessor() {
        let err = TranslateError::IdentifierEmpty {
            name: "$table".to_string(),
        };
        assert_eq!(err.placeholder(), Some("$table"));
        assert_eq!(TranslateError::EmptySql.placeholder(), None);
    }

    #[test]
    fn test_transient_errors() {
        let err: Error = TranslateError::EmptySql.into();
        assert!(!err.is_transient());

        let err = Error::execution_with_source(
            "backend unavailable",
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert!(!err.is_transient());

        let err = Error::encode("bad float");
        assert!(!err.is_transient());

        let err = Error::config("bad value");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_error_suggestions() {
        let err: Error = TranslateError::IdentifierTooLong {
            name: "$t".to_string(),
        }
        .into();
        assert!(err.suggestion().is_some());
        assert!(err.as_translate().is_some());

        let err = Error::execution_with_source("boom", std::io::Error::other("boom"));
        assert!(err.suggestion().is_none());
        assert!(err.as_translate().is_none());

        // encoding failures are not the caller's JSON
        let err = Error::encode("number out of range");
        assert!(err.suggestion().is_none());
        assert_eq!(err.to_string(), "Encoding error: number out of range");
    }

    #[test]
    fn test_translate_error_is_transparent() {
        let err: Error = TranslateError::ParameterNotProvided {
            name: "@status".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "parameter not provided in parameters: @status"
        );
    }
}
