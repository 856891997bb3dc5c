//! Security module: identifier sanitizing and placeholder discovery.

mod identifiers;
mod placeholders;

pub use identifiers::{is_valid_identifier_char, quote_identifier, quote_str, QuotedIdentifier};
pub use placeholders::{Occurrence, Placeholders};
