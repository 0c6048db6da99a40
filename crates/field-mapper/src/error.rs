//! Error types for field mapping.
//!
//! Resolution and aggregation failures are reported as [`MapperError`],
//! converter failures as [`ConversionError`], and mapping file problems as
//! [`ConfigError`]. All of them are deterministic: nothing here is retried.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Result alias for resolution and aggregation.
pub type Result<T> = std::result::Result<T, MapperError>;

/// Errors raised while resolving intents or computing field values.
#[derive(Error, Debug)]
pub enum MapperError {
    /// No provider in the registry defines the requested intent.
    #[error("Unable to find `{intent}' in [{}]", .providers.join(", "))]
    UnknownIndexMacro {
        intent: String,
        providers: Vec<String>,
    },

    /// The resolved descriptor has no rule for the field's data type, or
    /// needs one and none was supplied.
    #[error("index intent `{intent}' has no rule for the type of field '{field_name}'")]
    InvalidIndexDescriptor { intent: String, field_name: String },

    /// A converter could not interpret the raw value.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Errors raised by value converters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The value is not a date in any supported representation.
    #[error("cannot normalize '{value}' to a timestamp for field '{field_name}'")]
    UnparseableDate { field_name: String, value: String },

    /// The converter does not accept this kind of value.
    #[error("converter '{converter}' cannot convert '{value}' for field '{field_name}'")]
    UnsupportedValue {
        field_name: String,
        converter: String,
        value: String,
    },
}

/// Errors raised while loading a mapping file.
///
/// `path` is the file path, or `<embedded>` / `<inline>` for sources that
/// are not files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The mapping file could not be read.
    #[error("failed to read mappings from '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The mapping file is not valid YAML.
    #[error("failed to parse mappings in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The document root is not a mapping of intent names.
    #[error("mappings in '{path}' must be a mapping of intent names")]
    NotAMapping { path: String },

    /// A structured intent entry lacks a required key.
    #[error("intent '{intent}' in '{path}' is missing required key '{key}'")]
    MissingKey {
        path: String,
        intent: String,
        key: String,
    },

    /// An entry has the wrong shape.
    #[error("invalid entry '{key}' in '{path}': {message}")]
    InvalidEntry {
        path: String,
        key: String,
        message: String,
    },

    /// A rule names a converter that does not exist.
    #[error("intent '{intent}' in '{path}' uses unknown converter '{name}'")]
    UnknownConverter {
        path: String,
        intent: String,
        name: String,
    },
}
