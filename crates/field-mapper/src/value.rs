//! Field values.
//!
//! [`FieldValue`] is both the raw value handed to the mapper and the
//! converted value stored under an output field name.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A raw or converted field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Calendar date without time of day.
    Date(NaiveDate),
    /// Instant in UTC.
    DateTime(DateTime<Utc>),
    /// Multi-valued field.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Returns the text if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for text that is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ")),
            FieldValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Output of a converter: a single value or zero or more values.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    /// Exactly one value.
    One(FieldValue),
    /// Any number of values, including none.
    Many(Vec<FieldValue>),
}

impl Converted {
    /// No values.
    pub fn none() -> Self {
        Converted::Many(Vec::new())
    }

    /// Normalizes the output to a list of values.
    pub fn into_values(self) -> Vec<FieldValue> {
        match self {
            Converted::One(v) => vec![v],
            Converted::Many(vs) => vs,
        }
    }
}

impl From<FieldValue> for Converted {
    fn from(value: FieldValue) -> Self {
        Converted::One(value)
    }
}

impl From<Vec<FieldValue>> for Converted {
    fn from(values: Vec<FieldValue>) -> Self {
        Converted::Many(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(FieldValue::text("").is_blank());
        assert!(FieldValue::text("  ").is_blank());
        assert!(!FieldValue::text("x").is_blank());
        assert!(!FieldValue::Integer(0).is_blank());
    }

    #[test]
    fn test_converted_into_values() {
        assert_eq!(
            Converted::from(FieldValue::text("a")).into_values(),
            vec![FieldValue::text("a")]
        );
        assert!(Converted::none().into_values().is_empty());
    }

    #[test]
    fn test_display() {
        let date = NaiveDate::from_ymd_opt(2012, 11, 6).unwrap();
        assert_eq!(FieldValue::Date(date).to_string(), "2012-11-06");
        assert_eq!(FieldValue::from(vec![1i64, 2]).to_string(), "[1, 2]");
    }

    #[test]
    fn test_json_values() {
        let value: FieldValue = serde_json::from_str(r#"["rock", 3, true, 1.5]"#).unwrap();
        assert_eq!(
            value,
            FieldValue::List(vec![
                FieldValue::text("rock"),
                FieldValue::Integer(3),
                FieldValue::Boolean(true),
                FieldValue::Float(1.5),
            ])
        );
        assert_eq!(serde_json::to_string(&FieldValue::text("a")).unwrap(), r#""a""#);
    }
}
