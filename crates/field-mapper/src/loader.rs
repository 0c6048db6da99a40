//! Mapping file loader.
//!
//! Reads a declarative mapping document and materializes a [`MappingSet`]:
//! the identifier field plus one [`TableDescriptor`] per intent.
//!
//! ```yaml
//! id: id
//! searchable:
//!   default: _tesim
//!   date: _dtsi
//!   integer: { suffix: _isim, converter: integer }
//!   opts:
//!     default: true
//! sortable: _ssi
//! ```
//!
//! A bare string is a type-insensitive suffix. A mapping must contain
//! `default`; every other key except `opts` is a type tag. Bare rules for
//! `date` and `time` normalize their values to timestamps.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde_yaml_ng::{Mapping, Value};
use tracing::debug;

use crate::converter::Converter;
use crate::descriptor::{IntentOptions, Rule, TableDescriptor, TypeTable};
use crate::error::ConfigError;
use crate::provider::MappingSet;
use crate::types::TypeTag;

/// Mappings compiled into the crate.
pub const DEFAULT_MAPPINGS: &str = include_str!("../config/solr_mappings.yml");

/// Location of the compiled-in mappings, relative to the crate root.
pub const DEFAULT_MAPPINGS_PATH: &str = "config/solr_mappings.yml";

const ID_KEY: &str = "id";
const DEFAULT_KEY: &str = "default";
const OPTS_KEY: &str = "opts";

/// Where a mapping document comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MappingsSource {
    /// The mappings compiled into the crate.
    #[default]
    Embedded,
    /// A file on disk.
    File(PathBuf),
    /// A document held in memory.
    Inline(String),
}

impl MappingsSource {
    /// Source for a file path.
    pub fn file(path: impl AsRef<Path>) -> Self {
        MappingsSource::File(path.as_ref().to_path_buf())
    }

    /// Label used in error messages and logs.
    pub fn label(&self) -> String {
        match self {
            MappingsSource::Embedded => "<embedded>".to_string(),
            MappingsSource::File(path) => path.display().to_string(),
            MappingsSource::Inline(_) => "<inline>".to_string(),
        }
    }

    fn read(&self) -> Result<Cow<'_, str>, ConfigError> {
        match self {
            MappingsSource::Embedded => Ok(Cow::Borrowed(DEFAULT_MAPPINGS)),
            MappingsSource::Inline(text) => Ok(Cow::Borrowed(text)),
            MappingsSource::File(path) => std::fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|e| ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                }),
        }
    }
}

impl From<Option<PathBuf>> for MappingsSource {
    fn from(path: Option<PathBuf>) -> Self {
        path.map(MappingsSource::File).unwrap_or_default()
    }
}

/// Loader for mapping documents.
#[derive(Debug, Clone)]
pub struct MappingsLoader {
    provider_name: String,
}

impl Default for MappingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingsLoader {
    /// Creates a loader that names its provider `DefaultDescriptors`.
    pub fn new() -> Self {
        Self {
            provider_name: MappingSet::DEFAULT_NAME.to_string(),
        }
    }

    /// Sets the provider name reported in diagnostics.
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }

    /// Reads and parses a mapping document.
    pub fn load(&self, source: &MappingsSource) -> Result<MappingSet, ConfigError> {
        let label = source.label();
        let text = source.read()?;
        let mappings = self.parse(&text, &label)?;

        debug!(
            source = %label,
            intents = mappings.len(),
            id_field = mappings.id_field().unwrap_or("id"),
            "loaded field mappings"
        );

        Ok(mappings)
    }

    /// Parses a mapping document. `path` is only used in errors.
    pub fn parse(&self, text: &str, path: &str) -> Result<MappingSet, ConfigError> {
        let doc: Value = serde_yaml_ng::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            source: e,
        })?;

        let root = match doc {
            Value::Mapping(m) => m,
            _ => {
                return Err(ConfigError::NotAMapping {
                    path: path.to_string(),
                });
            }
        };

        let mut set = MappingSet::new(self.provider_name.clone()).with_builtin_descriptors();

        for (key, value) in &root {
            let key = key_str(path, key)?;

            if key == ID_KEY {
                let id = value.as_str().ok_or_else(|| ConfigError::InvalidEntry {
                    path: path.to_string(),
                    key: ID_KEY.to_string(),
                    message: "identifier field must be a string".to_string(),
                })?;
                set = set.with_id_field(id);
                continue;
            }

            let descriptor = parse_intent(path, key, value)?;
            set = set.with(key, descriptor);
        }

        Ok(set)
    }
}

fn key_str<'a>(path: &str, key: &'a Value) -> Result<&'a str, ConfigError> {
    key.as_str().ok_or_else(|| ConfigError::InvalidEntry {
        path: path.to_string(),
        key: format!("{:?}", key),
        message: "keys must be strings".to_string(),
    })
}

/// Parses one intent entry into a descriptor.
fn parse_intent(path: &str, intent: &str, value: &Value) -> Result<TableDescriptor, ConfigError> {
    match value {
        Value::String(suffix) => Ok(TableDescriptor::suffix(suffix.clone())),
        Value::Mapping(entry) => parse_structured_intent(path, intent, entry),
        _ => Err(ConfigError::InvalidEntry {
            path: path.to_string(),
            key: intent.to_string(),
            message: "expected a suffix string or a mapping of type suffixes".to_string(),
        }),
    }
}

fn parse_structured_intent(
    path: &str,
    intent: &str,
    entry: &Mapping,
) -> Result<TableDescriptor, ConfigError> {
    let default_value = entry
        .get(DEFAULT_KEY)
        .ok_or_else(|| ConfigError::MissingKey {
            path: path.to_string(),
            intent: intent.to_string(),
            key: DEFAULT_KEY.to_string(),
        })?;

    let mut table = TypeTable::new(parse_rule(path, intent, DEFAULT_KEY, default_value, None)?);
    let mut options = IntentOptions::default();

    for (key, value) in entry {
        let key = key_str(path, key)?;
        match key {
            DEFAULT_KEY => {}
            OPTS_KEY => options = parse_options(path, intent, value)?,
            tag => {
                let tag = TypeTag::from(tag);
                let rule = parse_rule(path, intent, tag.as_str(), value, Some(&tag))?;
                table = table.with_type(tag, rule);
            }
        }
    }

    Ok(TableDescriptor::new(table).with_options(options))
}

/// Parses a rule written as `_suffix` or `{ suffix: _suffix, converter: name }`.
fn parse_rule(
    path: &str,
    intent: &str,
    key: &str,
    value: &Value,
    tag: Option<&TypeTag>,
) -> Result<Rule, ConfigError> {
    match value {
        Value::String(suffix) => {
            let rule = Rule::suffix(suffix.clone());
            Ok(match tag {
                Some(t) if t.is_temporal() => rule.with_converter(Converter::iso8601()),
                _ => rule,
            })
        }
        Value::Mapping(m) => {
            let suffix = m
                .get("suffix")
                .and_then(Value::as_str)
                .ok_or_else(|| ConfigError::MissingKey {
                    path: path.to_string(),
                    intent: intent.to_string(),
                    key: format!("{}.suffix", key),
                })?;
            let mut rule = Rule::suffix(suffix);
            if let Some(name) = m.get("converter") {
                let name = name.as_str().ok_or_else(|| ConfigError::InvalidEntry {
                    path: path.to_string(),
                    key: format!("{}.{}.converter", intent, key),
                    message: "converter must be a name".to_string(),
                })?;
                let converter =
                    Converter::named(name).ok_or_else(|| ConfigError::UnknownConverter {
                        path: path.to_string(),
                        intent: intent.to_string(),
                        name: name.to_string(),
                    })?;
                rule = rule.with_converter(converter);
            }
            Ok(rule)
        }
        _ => Err(ConfigError::InvalidEntry {
            path: path.to_string(),
            key: format!("{}.{}", intent, key),
            message: "expected a suffix string or { suffix, converter }".to_string(),
        }),
    }
}

fn parse_options(path: &str, intent: &str, value: &Value) -> Result<IntentOptions, ConfigError> {
    let opts = value.as_mapping().ok_or_else(|| ConfigError::InvalidEntry {
        path: path.to_string(),
        key: format!("{}.{}", intent, OPTS_KEY),
        message: "options must be a mapping".to_string(),
    })?;

    let mut options = IntentOptions::default();
    for (key, value) in opts {
        let key = key_str(path, key)?;
        if key == DEFAULT_KEY {
            options.default = value.as_bool().ok_or_else(|| ConfigError::InvalidEntry {
                path: path.to_string(),
                key: format!("{}.{}.{}", intent, OPTS_KEY, DEFAULT_KEY),
                message: "must be true or false".to_string(),
            })?;
        } else {
            options.extra.insert(key.to_string(), value.clone());
        }
    }
    Ok(options)
}
