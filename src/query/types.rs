//! BigQuery parameter value types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A value that can be bound to a query parameter.
///
/// Deserializes untagged from JSON: null, booleans, integers, floats, strings
/// and arrays. The remaining variants are constructed from Rust values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingValue {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    Array(Vec<BindingValue>),
    Bytes(Vec<u8>),
    Numeric(Decimal),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
}

impl BindingValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, BindingValue::Null)
    }

    /// Canonical textual form, used when the value names an identifier.
    ///
    /// `Null` renders as the empty string.
    pub fn to_canonical_text(&self) -> String {
        match self {
            BindingValue::Null => String::new(),
            BindingValue::Bool(v) => v.to_string(),
            BindingValue::Int64(v) => v.to_string(),
            BindingValue::Float64(v) => v.to_string(),
            BindingValue::String(v) => v.clone(),
            BindingValue::Array(values) => {
                let items: Vec<String> = values.iter().map(|v| v.to_canonical_text()).collect();
                format!("[{}]", items.join(", "))
            }
            BindingValue::Bytes(v) => hex::encode(v),
            BindingValue::Numeric(v) => v.to_string(),
            BindingValue::Date(v) => v.to_string(),
            BindingValue::Time(v) => v.to_string(),
            BindingValue::DateTime(v) => v.to_string(),
            BindingValue::Timestamp(v) => v.to_rfc3339(),
        }
    }

    /// BigQuery type name of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            BindingValue::Null => "NULL",
            BindingValue::Bool(_) => "BOOL",
            BindingValue::Int64(_) => "INT64",
            BindingValue::Float64(_) => "FLOAT64",
            BindingValue::String(_) => "STRING",
            BindingValue::Array(_) => "ARRAY",
            BindingValue::Bytes(_) => "BYTES",
            BindingValue::Numeric(_) => "NUMERIC",
            BindingValue::Date(_) => "DATE",
            BindingValue::Time(_) => "TIME",
            BindingValue::DateTime(_) => "DATETIME",
            BindingValue::Timestamp(_) => "TIMESTAMP",
        }
    }
}

impl From<&str> for BindingValue {
    fn from(v: &str) -> Self {
        BindingValue::String(v.to_string())
    }
}

impl From<String> for BindingValue {
    fn from(v: String) -> Self {
        BindingValue::String(v)
    }
}

impl From<bool> for BindingValue {
    fn from(v: bool) -> Self {
        BindingValue::Bool(v)
    }
}

impl From<i32> for BindingValue {
    fn from(v: i32) -> Self {
        BindingValue::Int64(i64::from(v))
    }
}

impl From<i64> for BindingValue {
    fn from(v: i64) -> Self {
        BindingValue::Int64(v)
    }
}

impl From<f64> for BindingValue {
    fn from(v: f64) -> Self {
        BindingValue::Float64(v)
    }
}

impl From<Decimal> for BindingValue {
    fn from(v: Decimal) -> Self {
        BindingValue::Numeric(v)
    }
}

impl From<NaiveDate> for BindingValue {
    fn from(v: NaiveDate) -> Self {
        BindingValue::Date(v)
    }
}

impl From<NaiveDateTime> for BindingValue {
    fn from(v: NaiveDateTime) -> Self {
        BindingValue::DateTime(v)
    }
}

impl From<DateTime<Utc>> for BindingValue {
    fn from(v: DateTime<Utc>) -> Self {
        BindingValue::Timestamp(v)
    }
}

impl<T: Into<BindingValue>> From<Vec<T>> for BindingValue {
    fn from(values: Vec<T>) -> Self {
        BindingValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<BindingValue>> From<Option<T>> for BindingValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(BindingValue::Null, Into::into)
    }
}

/// Uppercase hex encoding for byte values.
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02X}", b)).collect()
    }
}
