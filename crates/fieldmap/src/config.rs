//! Command-line configuration for `fieldmap`.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FIELDMAP_MAPPINGS` | embedded | Mapping file to load |
//! | `FIELDMAP_LOG_LEVEL` | warn | Log level |
//!
//! `RUST_LOG`, when set, takes precedence over the log level.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use helios_field_mapper::{ConfigError, FieldMapper, MapperConfig, MappingsSource};

/// Maps application fields to search index field names and values.
#[derive(Debug, Clone, Parser)]
#[command(name = "fieldmap")]
#[command(version)]
#[command(about = "Maps application fields to search index field names and values")]
pub struct CliConfig {
    /// Mapping file to load instead of the embedded defaults.
    #[arg(long, env = "FIELDMAP_MAPPINGS", global = true)]
    pub mappings: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "FIELDMAP_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the output field name for one intent
    Name {
        /// Field name
        field: String,
        /// Data type tag (string, integer, date, ...)
        #[arg(short = 't', long = "type")]
        field_type: Option<String>,
        /// Intent; the mapper's default intent when omitted
        #[arg(short, long)]
        intent: Option<String>,
    },

    /// Compute the index fields for a value, printed as JSON
    Compute {
        /// Field name
        field: String,
        /// Raw value
        value: String,
        /// Data type tag (string, integer, date, ...)
        #[arg(short = 't', long = "type")]
        field_type: Option<String>,
        /// Intents, repeated or comma-separated; the mappings' default
        /// intents when omitted
        #[arg(short, long = "intent", value_delimiter = ',')]
        intents: Vec<String>,
        /// Parse the value as JSON (numbers, booleans, lists)
        #[arg(long)]
        json: bool,
    },

    /// Print the identifier field name
    Id,

    /// List every intent the mapper can resolve, as JSON
    Intents,
}

impl CliConfig {
    /// Where the mappings come from.
    pub fn mappings_source(&self) -> MappingsSource {
        MappingsSource::from(self.mappings.clone())
    }

    /// Builds the mapper described by this configuration.
    pub fn build_mapper(&self) -> Result<FieldMapper, ConfigError> {
        let config = MapperConfig::builder("fieldmap")
            .mappings_source(self.mappings_source())
            .build()?;
        Ok(FieldMapper::new(config.into()))
    }
}
