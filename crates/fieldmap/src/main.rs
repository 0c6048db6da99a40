//! Helios field mapper command line.
//!
//! Resolves index field names and computes index values using the embedded
//! mappings or a mapping file.

mod commands;
mod config;

use clap::Parser;
use config::CliConfig;
use tracing::info;

/// Initializes the logging subsystem. `RUST_LOG` wins over `level`.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("helios_field_mapper={},helios_fieldmap={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    let source = config.mappings_source();
    info!(mappings = %source.label(), "Loading field mappings");
    let mapper = config.build_mapper()?;

    let output = commands::run(&mapper, &config.command)?;
    println!("{}", output);
    Ok(())
}
