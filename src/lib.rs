//! # saferbq
//!
//! Safe identifier templating for BigQuery SQL.
//!
//! BigQuery binds data values through `@name` and `?` parameters, but table
//! and dataset names cannot be parameterized. This crate adds `$identifier`
//! placeholders that are sanitized, backtick-quoted and written into the SQL
//! text, while `@name` and `?` are left for the engine to bind.
//!
//! ## Guarantees
//!
//! - Every placeholder in the SQL has exactly one binding and every binding is used
//! - Identifier values can never leave their backtick quotes
//! - Identifier values longer than 1024 bytes are rejected
//!
//! ```
//! use saferbq::{Binding, TranslateError, translate};
//!
//! let err = translate(
//!     "SELECT * FROM $table WHERE user_id = @uid",
//!     &[Binding::new("$table", "logs`; DROP TABLE x"), Binding::new("@uid", 123i64)],
//! )
//! .unwrap_err();
//!
//! assert!(matches!(err, TranslateError::IdentifierInvalidChars { .. }));
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod query;
pub mod request;
pub mod security;

pub use config::Config;
pub use error::{Error, TranslateError};
pub use query::{
    translate, Binding, BindingValue, PlaceholderKind, Query, QueryExecutor, Translation,
};
pub use security::{quote_identifier, QuotedIdentifier};
