//! Data type tags.
//!
//! A type tag classifies the data held by an application field. Descriptors
//! use it to pick a type-specific naming and conversion rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Symbolic data-type classifier for a field.
///
/// The well-known tags have their own variants; anything else is kept as
/// [`TypeTag::Other`] so configuration files can introduce custom tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TypeTag {
    /// Short string, indexed verbatim.
    String,
    /// Free text, tokenized by the index.
    Text,
    /// Symbolic identifier (enum-like string).
    Symbol,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Boolean flag.
    Boolean,
    /// Calendar date.
    Date,
    /// Date with time of day.
    Time,
    /// Any tag without a dedicated variant.
    Other(String),
}

impl TypeTag {
    /// Returns the tag as it is written in mapping files.
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::String => "string",
            TypeTag::Text => "text",
            TypeTag::Symbol => "symbol",
            TypeTag::Integer => "integer",
            TypeTag::Long => "long",
            TypeTag::Float => "float",
            TypeTag::Double => "double",
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
            TypeTag::Time => "time",
            TypeTag::Other(s) => s,
        }
    }

    /// Short code used when composing a suffix from a type and index
    /// flags (`string` + indexed gives `_si`). `None` for custom tags.
    pub fn index_code(&self) -> Option<&'static str> {
        match self {
            TypeTag::String | TypeTag::Symbol => Some("s"),
            TypeTag::Text => Some("te"),
            TypeTag::Integer => Some("i"),
            TypeTag::Long => Some("lt"),
            TypeTag::Float => Some("f"),
            TypeTag::Double => Some("db"),
            TypeTag::Boolean => Some("b"),
            TypeTag::Date | TypeTag::Time => Some("dt"),
            TypeTag::Other(_) => None,
        }
    }

    /// Returns true for tags whose values are calendar values.
    pub fn is_temporal(&self) -> bool {
        matches!(self, TypeTag::Date | TypeTag::Time)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "string" => TypeTag::String,
            "text" => TypeTag::Text,
            "symbol" => TypeTag::Symbol,
            "integer" => TypeTag::Integer,
            "long" => TypeTag::Long,
            "float" => TypeTag::Float,
            "double" => TypeTag::Double,
            "boolean" => TypeTag::Boolean,
            "date" => TypeTag::Date,
            "time" => TypeTag::Time,
            other => TypeTag::Other(other.to_string()),
        })
    }
}

impl From<&str> for TypeTag {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl From<String> for TypeTag {
    fn from(s: String) -> Self {
        TypeTag::from(s.as_str())
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> Self {
        tag.as_str().to_string()
    }
}
