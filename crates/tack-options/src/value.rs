//! Values produced by the parser and carried as declaration defaults.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::token::is_numeric_literal;

/// A parsed (or default) value for one option or argument.
///
/// Serialized untagged, so `Value::Integer(3)` is `3` in JSON and
/// `Value::Hash` is a plain object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<String>),
    Hash(IndexMap<String, String>),
}

impl Value {
    /// Parse a whole-token numeric literal.
    ///
    /// Literals containing `.` become `Float`, everything else `Integer`.
    /// Returns `None` for anything that is not a numeric literal in its
    /// entirety, and for integers that do not fit in an `i64`.
    pub fn parse_numeric(raw: &str) -> Option<Value> {
        if !is_numeric_literal(raw) {
            return None;
        }
        if raw.contains('.') {
            raw.parse::<f64>().ok().map(Value::Float)
        } else {
            raw.parse::<i64>().ok().map(Value::Integer)
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as `f64` (integers are widened).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[String]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Self::Hash(map) => Some(map),
            _ => None,
        }
    }

    /// An array or hash with no entries.
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Self::Array(items) => items.is_empty(),
            Self::Hash(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Short name of the variant, used in configuration errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Integer(_) | Self::Float(_) => "numeric",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Hash(_) => "hash",
        }
    }
}

/// Render a float so that it re-parses as a float (`2.0`, never `2`).
pub(crate) fn format_float(f: f64) -> String {
    let s = f.to_string();
    if s.contains('.') || !f.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => f.write_str(&format_float(*x)),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => f.write_str(&items.join(" ")),
            Self::Hash(map) => {
                let pairs: Vec<String> = map.iter().map(|(k, v)| format!("{k}:{v}")).collect();
                f.write_str(&pairs.join(" "))
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::Array(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Self::Array(items.into_iter().map(str::to_string).collect())
    }
}

impl From<IndexMap<String, String>> for Value {
    fn from(map: IndexMap<String, String>) -> Self {
        Self::Hash(map)
    }
}
