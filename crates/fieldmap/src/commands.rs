//! Subcommand implementations.
//!
//! Each command renders its result as a string so the binary only has to
//! print it.

use anyhow::{Context, Result};
use helios_field_mapper::{FieldMapper, FieldValue, TypeTag};
use serde_json::json;
use tracing::debug;

use crate::config::Command;

/// Runs a subcommand against a mapper.
pub fn run(mapper: &FieldMapper, command: &Command) -> Result<String> {
    match command {
        Command::Name {
            field,
            field_type,
            intent,
        } => {
            let field_type = field_type.as_deref().map(TypeTag::from);
            let name = match intent {
                Some(intent) => mapper.resolve_name(field, field_type.as_ref(), intent)?,
                None => mapper.solr_name(field, field_type.as_ref())?,
            };
            Ok(name)
        }
        Command::Compute {
            field,
            value,
            field_type,
            intents,
            json,
        } => {
            let value = if *json {
                serde_json::from_str::<FieldValue>(value)
                    .with_context(|| format!("value is not JSON: {}", value))?
            } else {
                FieldValue::text(value.as_str())
            };
            let intents = if intents.is_empty() {
                mapper.default_intents()
            } else {
                intents.clone()
            };
            debug!(field = %field, intents = ?intents, "computing fields");

            let field_type = field_type.as_deref().map(TypeTag::from);
            let fields = mapper.compute(field, &value, field_type.as_ref(), intents.as_slice())?;
            Ok(serde_json::to_string_pretty(&fields)?)
        }
        Command::Id => Ok(mapper.id_field().to_string()),
        Command::Intents => {
            let defaults = mapper.default_intents();
            let intents: Vec<_> = mapper
                .intents()
                .into_iter()
                .map(|intent| {
                    let default = defaults.contains(&intent);
                    json!({ "intent": intent, "default": default })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&intents)?)
        }
    }
}
