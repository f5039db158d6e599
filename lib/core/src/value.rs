//! Scalar cell values
//!
//! A [`Value`] is what a single table cell holds. Numbers are wrapped in
//! [`OrderedFloat`] so values can be hashed and compared, which lets them act
//! directly as group-by keys.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell value
///
/// Serialized untagged, so a table row round-trips as a plain JSON object.
/// Missing keys and JSON `null` are both read back as [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    Bool(bool),
    Number(OrderedFloat<f64>),
    Text(String),
}

pub(crate) static NULL: Value = Value::Null;

impl Value {
    /// Create a numeric value. Non-finite input becomes [`Value::Null`].
    pub fn number(n: f64) -> Self {
        if n.is_finite() {
            Value::Number(OrderedFloat(n))
        } else {
            Value::Null
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value
    ///
    /// Numbers are returned as-is and text is accepted when it parses as a
    /// finite number (uploaded CSV data arrives as strings). Everything else
    /// yields `None`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.into_inner()),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(n.into_inner())),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Render a number for use inside labels
///
/// Infinite bounds are spelled `Infinity` / `-Infinity` so bucket labels read
/// the same as the ones the exploration front-end already displays.
pub fn format_number(n: f64) -> String {
    if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n.is_nan() {
        "NaN".to_string()
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_deserialize() {
        let values: Vec<Value> = serde_json::from_value(json!([null, true, 3, 2.5, "east"])).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::number(3.0),
                Value::number(2.5),
                Value::text("east"),
            ]
        );
    }

    #[test]
    fn test_to_number_accepts_numeric_text() {
        assert_eq!(Value::text(" 12.5 ").to_number(), Some(12.5));
        assert_eq!(Value::text("north").to_number(), None);
        assert_eq!(Value::Bool(true).to_number(), None);
        assert_eq!(Value::Null.to_number(), None);
    }

    #[test]
    fn test_non_finite_becomes_null() {
        assert!(Value::number(f64::NAN).is_null());
        assert!(Value::number(f64::INFINITY).is_null());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.25), "2.25");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }
}
