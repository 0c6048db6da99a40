//! Value converters.
//!
//! A converter turns a raw field value into the value(s) stored under an
//! output field name. Converters declare their arity explicitly: a unary
//! converter sees only the value, a binary converter also receives the
//! field name.

use std::fmt;
use std::sync::Arc;

use crate::dates;
use crate::error::ConversionError;
use crate::value::{Converted, FieldValue};

/// Converter taking only the value.
pub type UnaryFn = dyn Fn(&FieldValue) -> Result<Converted, ConversionError> + Send + Sync;

/// Converter taking the value and the field name.
pub type BinaryFn =
    dyn Fn(&FieldValue, &str) -> Result<Converted, ConversionError> + Send + Sync;

/// Number of arguments a converter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `(value)`
    Unary,
    /// `(value, field_name)`
    Binary,
}

/// A value conversion procedure attached to a naming rule.
#[derive(Clone, Default)]
pub enum Converter {
    /// Passes the value through unchanged.
    #[default]
    Identity,
    /// Converts using the value alone.
    Unary(Arc<UnaryFn>),
    /// Converts using the value and the field name.
    Binary(Arc<BinaryFn>),
}

impl Converter {
    /// Names accepted by [`Converter::named`].
    pub const NAMES: &'static [&'static str] = &["identity", "iso8601", "string", "integer", "boolean"];

    /// Wraps a closure over the value.
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<Converted, ConversionError> + Send + Sync + 'static,
    {
        Converter::Unary(Arc::new(f))
    }

    /// Wraps a closure over the value and the field name.
    pub fn binary<F>(f: F) -> Self
    where
        F: Fn(&FieldValue, &str) -> Result<Converted, ConversionError> + Send + Sync + 'static,
    {
        Converter::Binary(Arc::new(f))
    }

    /// Looks up a built-in converter by the name used in mapping files.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "identity" => Some(Converter::Identity),
            "iso8601" => Some(Converter::iso8601()),
            "string" => Some(Converter::stringify()),
            "integer" => Some(Converter::integer()),
            "boolean" => Some(Converter::boolean()),
            _ => None,
        }
    }

    /// Normalizes calendar values to a UTC timestamp string. Blank input
    /// produces no values.
    pub fn iso8601() -> Self {
        Converter::binary(|value, field_name| {
            Ok(match dates::normalize(value, field_name)? {
                Some(timestamp) => Converted::One(FieldValue::Text(timestamp)),
                None => Converted::none(),
            })
        })
    }

    /// Renders any value as text.
    pub fn stringify() -> Self {
        Converter::unary(|value| Ok(Converted::One(FieldValue::Text(value.to_string()))))
    }

    /// Coerces integers and integer text to an integer value.
    pub fn integer() -> Self {
        Converter::binary(|value, field_name| match value {
            FieldValue::Integer(i) => Ok(Converted::One(FieldValue::Integer(*i))),
            FieldValue::Text(s) if s.trim().is_empty() => Ok(Converted::none()),
            FieldValue::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(|i| Converted::One(FieldValue::Integer(i)))
                .map_err(|_| unsupported(field_name, "integer", value)),
            other => Err(unsupported(field_name, "integer", other)),
        })
    }

    /// Coerces booleans, `true`/`false` text and 0/1 to a boolean value.
    pub fn boolean() -> Self {
        Converter::binary(|value, field_name| match value {
            FieldValue::Boolean(b) => Ok(Converted::One(FieldValue::Boolean(*b))),
            FieldValue::Integer(0) => Ok(Converted::One(FieldValue::Boolean(false))),
            FieldValue::Integer(1) => Ok(Converted::One(FieldValue::Boolean(true))),
            FieldValue::Text(s) if s.trim().is_empty() => Ok(Converted::none()),
            FieldValue::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(Converted::One(FieldValue::Boolean(true))),
                "false" => Ok(Converted::One(FieldValue::Boolean(false))),
                _ => Err(unsupported(field_name, "boolean", value)),
            },
            other => Err(unsupported(field_name, "boolean", other)),
        })
    }

    /// Returns the declared arity.
    pub fn arity(&self) -> Arity {
        match self {
            Converter::Identity | Converter::Unary(_) => Arity::Unary,
            Converter::Binary(_) => Arity::Binary,
        }
    }

    /// Returns true for the identity converter.
    pub fn is_identity(&self) -> bool {
        matches!(self, Converter::Identity)
    }

    /// Applies the converter and normalizes its output to a list.
    ///
    /// List values are converted element by element and flattened.
    pub fn apply(
        &self,
        value: &FieldValue,
        field_name: &str,
    ) -> Result<Vec<FieldValue>, ConversionError> {
        match value {
            FieldValue::List(items) => {
                let mut results = Vec::new();
                for item in items {
                    results.extend(self.apply(item, field_name)?);
                }
                Ok(results)
            }
            _ => self.apply_single(value, field_name),
        }
    }

    fn apply_single(
        &self,
        value: &FieldValue,
        field_name: &str,
    ) -> Result<Vec<FieldValue>, ConversionError> {
        let converted = match self {
            Converter::Identity => Converted::One(value.clone()),
            Converter::Unary(f) => f(value)?,
            Converter::Binary(f) => f(value, field_name)?,
        };
        Ok(converted.into_values())
    }
}

fn unsupported(field_name: &str, converter: &str, value: &FieldValue) -> ConversionError {
    ConversionError::UnsupportedValue {
        field_name: field_name.to_string(),
        converter: converter.to_string(),
        value: value.to_string(),
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converter::Identity => write!(f, "Identity"),
            Converter::Unary(_) => write!(f, "Unary(..)"),
            Converter::Binary(_) => write!(f, "Binary(..)"),
        }
    }
}
