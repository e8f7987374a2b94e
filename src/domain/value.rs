//! Typed cell values.

use std::fmt;

use rusqlite::types::ValueRef;
use serde::{Serialize, Serializer};

/// A single cell read from the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Placeholder used wherever binary content is rendered as text.
    #[must_use]
    pub fn blob_placeholder(len: usize) -> String {
        format!("<BLOB {len} bytes>")
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Numeric view of the value, if it has one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
            Value::Null | Value::Text(_) | Value::Blob(_) => None,
        }
    }

    /// Text that search compares against, lowercased. NULL and blobs have none.
    #[must_use]
    pub fn searchable_text(&self) -> Option<String> {
        match self {
            Value::Null | Value::Blob(_) => None,
            Value::Integer(_) | Value::Real(_) | Value::Text(_) => {
                Some(self.to_string().to_lowercase())
            }
        }
    }
}

/// Render a real so integral values keep a trailing `.0`.
pub(crate) fn format_real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => f.write_str(&format_real(*v)),
            Value::Text(v) => f.write_str(v),
            Value::Blob(v) => f.write_str(&Value::blob_placeholder(v.len())),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Real(v) if v.is_finite() => serializer.serialize_f64(*v),
            Value::Real(_) => serializer.serialize_none(),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Blob(v) => serializer.serialize_str(&Value::blob_placeholder(v.len())),
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
