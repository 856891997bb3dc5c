//! Configuration for the `saferbq` command-line front end.
//!
//! Configuration is loaded from environment variables following the 12-factor app pattern.

use crate::constants::DEFAULT_MAX_INPUT_BYTES;
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// How a successful translation is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Compact JSON `{"sql": ..., "parameters": [...]}`.
    #[default]
    Json,

    /// Indented JSON.
    Pretty,

    /// Only the translated SQL text.
    Sql,
}

impl OutputFormat {
    /// Parse a format name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "pretty" | "json-pretty" => Some(OutputFormat::Pretty),
            "sql" | "raw" => Some(OutputFormat::Sql),
            _ => None,
        }
    }
}

/// Front-end configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output format for successful translations
    pub output: OutputFormat,

    /// Maximum request size (bytes)
    pub max_input_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SAFERBQ_OUTPUT`: `json`, `pretty` or `sql` (default: json)
    /// - `SAFERBQ_MAX_INPUT_BYTES`: maximum request size (default: 1048576)
    pub fn from_env() -> Result<Self, Error> {
        let output = std::env::var("SAFERBQ_OUTPUT")
            .ok()
            .and_then(|v| OutputFormat::parse(&v))
            .unwrap_or_default();

        let max_input_bytes = match std::env::var("SAFERBQ_MAX_INPUT_BYTES") {
            Ok(v) => v.trim().parse::<usize>().map_err(|_| {
                Error::config(format!(
                    "SAFERBQ_MAX_INPUT_BYTES must be a positive integer, got '{}'",
                    v
                ))
            })?,
            Err(_) => DEFAULT_MAX_INPUT_BYTES,
        };

        if max_input_bytes == 0 {
            return Err(Error::config("SAFERBQ_MAX_INPUT_BYTES must be greater than 0"));
        }

        Ok(Config {
            output,
            max_input_bytes,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputFormat::Json,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}
