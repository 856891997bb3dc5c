//! Centralized constants for saferbq.
//!
//! Placeholder markers, quoting characters and size limits used by the
//! sanitizer, the translator and the command-line front end.

// =============================================================================
// Placeholder Markers
// =============================================================================

/// Prefix for identifier placeholders (`$table`).
pub const IDENTIFIER_MARKER: char = '$';

/// Prefix for named value placeholders (`@status`).
pub const NAMED_MARKER: char = '@';

/// Symbol for positional value placeholders.
pub const POSITIONAL_SYMBOL: char = '?';

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote character wrapped around every sanitized identifier.
pub const QUOTE_CHAR: char = '`';

/// Character substituted for every rejected code point.
pub const REPLACEMENT_CHAR: char = '_';

/// Maximum length for a BigQuery identifier in bytes, without the quotes.
pub const MAX_IDENTIFIER_BYTES: usize = 1024;

// =============================================================================
// Command-Line Front End
// =============================================================================

/// Default maximum size of a translation request read by the binary.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Maximum number of SQL characters echoed into debug logs.
pub const LOG_SQL_PREVIEW_CHARS: usize = 200;
