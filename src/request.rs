//! JSON request handling for the command-line front end.

use crate::config::{Config, OutputFormat};
use crate::error::Error;
use crate::query::{translate, Binding};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// A translation request: `{"sql": "...", "parameters": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// SQL template.
    pub sql: String,

    /// Supplied bindings.
    #[serde(default)]
    pub parameters: Vec<Binding>,
}

/// Read a request of at most `max_bytes` bytes.
///
/// The reader is never drained past the limit, so an oversized request is
/// rejected without being buffered in full.
pub fn read_request<R: Read>(reader: R, max_bytes: usize) -> Result<String, Error> {
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut input = String::new();
    reader
        .take(limit)
        .read_to_string(&mut input)
        .map_err(|e| Error::invalid_input(format!("Failed to read request: {}", e)))?;

    if input.len() > max_bytes {
        return Err(oversized(max_bytes));
    }
    Ok(input)
}

fn oversized(max_bytes: usize) -> Error {
    Error::invalid_input(format!("Request exceeds maximum size of {} bytes", max_bytes))
}

/// Parse a request, translate it and render the output.
pub fn handle_request(input: &str, config: &Config) -> Result<String, Error> {
    if input.len() > config.max_input_bytes {
        return Err(oversized(config.max_input_bytes));
    }

    let request: TranslationRequest = serde_json::from_str(input)
        .map_err(|e| Error::invalid_input(format!("Malformed request: {}", e)))?;

    let translation = translate(&request.sql, &request.parameters)?;

    let rendered = match config.output {
        OutputFormat::Json => serde_json::to_string(&translation),
        OutputFormat::Pretty => serde_json::to_string_pretty(&translation),
        OutputFormat::Sql => return Ok(translation.sql),
    };
    rendered.map_err(|e| Error::encode(format!("Failed to encode result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;

    fn json_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_json_output() {
        let input = r#"{
            "sql": "SELECT * FROM $t WHERE s = @s AND n > ?",
            "parameters": [
                {"name": "$t", "value": "events"},
                {"name": "@s", "value": "ok"},
                {"value": 5}
            ]
        }"#;
        let out = handle_request(input, &json_config()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["sql"], "SELECT * FROM `events` WHERE s = @s AND n > ?");
        assert_eq!(
            value["parameters"],
            serde_json::json!([
                {"name": "s", "value": "ok"},
                {"name": "", "value": 5}
            ])
        );
    }

    #[test]
    fn test_sql_output() {
        let config = Config {
            output: OutputFormat::Sql,
            ..Config::default()
        };
        let input = r#"{"sql": "SELECT 1 FROM $a.$b", "parameters": [
            {"name": "$a", "value": "d"}, {"name": "$b", "value": "t"}]}"#;
        assert_eq!(handle_request(input, &config).unwrap(), "SELECT 1 FROM `d`.`t`");
    }

    #[test]
    fn test_missing_parameters_field() {
        let out = handle_request(r#"{"sql": "SELECT 1"}"#, &json_config()).unwrap();
        assert!(out.contains("\"parameters\":[]"));
    }

    #[test]
    fn test_translation_error_propagates() {
        let input = r#"{"sql": "SELECT * FROM $t", "parameters": [{"name": "$t", "value": "a;b"}]}"#;
        let err = handle_request(input, &json_config()).unwrap_err();
        assert_eq!(
            err.as_translate(),
            Some(&TranslateError::IdentifierInvalidChars {
                name: "$t".to_string(),
                rejected: ";".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_request() {
        let err = handle_request("not json", &json_config()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    /// Reader that yields an endless stream of bytes.
    struct Endless;

    impl Read for Endless {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            buf.fill(b' ');
            Ok(buf.len())
        }
    }

    #[test]
    fn test_read_request_within_limit() {
        let body = r#"{"sql": "SELECT 1"}"#;
        let input = read_request(body.as_bytes(), body.len()).unwrap();
        assert_eq!(input, body);
    }

    #[test]
    fn test_read_request_over_limit() {
        let body = r#"{"sql": "SELECT 1"}"#;
        let err = read_request(std::io::Cursor::new(body), body.len() - 1).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("maximum size of 18 bytes"));
    }

    #[test]
    fn test_read_request_stops_at_limit() {
        // would never return if the whole stream were read
        let err = read_request(Endless, 64).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_read_request_rejects_invalid_utf8() {
        let err = read_request(&[0xff, 0xfe, b'{'][..], 16).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_request_size_limit() {
        let config = Config {
            max_input_bytes: 8,
            ..Config::default()
        };
        let err = handle_request(r#"{"sql": "SELECT 1"}"#, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
