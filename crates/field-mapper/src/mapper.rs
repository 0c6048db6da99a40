//! Field mappers.
//!
//! A [`MapperConfig`] is the immutable definition of one mapper type: its
//! provider registry, identifier field and default intent. A
//! [`FieldMapper`] holds an `Arc` to a config and does the actual work:
//! resolving names and computing the index fields for a value.
//!
//! Reloading mappings never mutates a config. [`MapperConfig::reloaded`]
//! builds a new one, and [`MapperCatalog`] swaps the entry for a single
//! mapper type. Mappers created earlier keep the config they were built
//! with.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::{debug, trace, warn};

use crate::descriptor::Descriptor;
use crate::error::{ConfigError, MapperError, Result};
use crate::loader::{MappingsLoader, MappingsSource};
use crate::provider::{DescriptorProvider, MappingSet, ProviderRegistry};
use crate::types::TypeTag;
use crate::value::FieldValue;

/// Identifier field used when neither the mapper nor its mappings set one.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Intent used by [`FieldMapper::solr_name`] unless configured otherwise:
/// the built-in type code plus `i` rule.
pub const DEFAULT_INTENT: &str = MappingSet::SIMPLE;

/// Name of the mapper type backed only by the embedded mappings.
pub const DEFAULT_MAPPER: &str = "Default";

/// Output field name → converted values, in first-seen order.
pub type FieldSet = IndexMap<String, Vec<FieldValue>>;

/// Immutable definition of a mapper type.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    name: String,
    id_field: Option<String>,
    default_intent: String,
    registry: ProviderRegistry,
}

impl MapperConfig {
    /// Starts a config for the named mapper type.
    pub fn builder(name: impl Into<String>) -> MapperConfigBuilder {
        MapperConfigBuilder::new(name)
    }

    /// The default mapper: embedded mappings and nothing else.
    pub fn default_config() -> std::result::Result<Self, ConfigError> {
        Self::builder(DEFAULT_MAPPER).build()
    }

    /// Mapper type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier field: the mapper's own setting, else the one declared
    /// by its mappings, else `id`.
    pub fn id_field(&self) -> &str {
        self.id_field
            .as_deref()
            .or_else(|| self.registry.mappings().id_field())
            .unwrap_or(DEFAULT_ID_FIELD)
    }

    /// Intent used when none is given.
    pub fn default_intent(&self) -> &str {
        &self.default_intent
    }

    /// Providers in search order.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Returns a new config whose configuration-backed provider is loaded
    /// from `source`. Custom providers and settings are kept.
    pub fn reloaded(&self, source: &MappingsSource) -> std::result::Result<Self, ConfigError> {
        let mappings = MappingsLoader::new()
            .with_provider_name(self.registry.mappings().name())
            .load(source)?;
        Ok(self.with_mappings(mappings))
    }

    /// Returns a new config using `mappings` as its configuration-backed
    /// provider.
    pub fn with_mappings(&self, mappings: MappingSet) -> Self {
        Self {
            name: self.name.clone(),
            id_field: self.id_field.clone(),
            default_intent: self.default_intent.clone(),
            registry: self.registry.with_mappings(mappings),
        }
    }
}

/// Builder for [`MapperConfig`].
#[derive(Debug)]
pub struct MapperConfigBuilder {
    name: String,
    id_field: Option<String>,
    default_intent: Option<String>,
    providers: Vec<Arc<dyn DescriptorProvider>>,
    mappings: Option<MappingSet>,
    source: MappingsSource,
}

impl MapperConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_field: None,
            default_intent: None,
            providers: Vec::new(),
            mappings: None,
            source: MappingsSource::Embedded,
        }
    }

    /// Sets the identifier field, overriding the mappings.
    pub fn id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = Some(id_field.into());
        self
    }

    /// Sets the intent used when none is given.
    pub fn default_intent(mut self, intent: impl Into<String>) -> Self {
        self.default_intent = Some(intent.into());
        self
    }

    /// Appends a provider. Providers are searched in the order added, all
    /// ahead of the mappings.
    pub fn provider(mut self, provider: impl DescriptorProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Appends a shared provider, e.g. one inherited from another mapper.
    pub fn shared_provider(mut self, provider: Arc<dyn DescriptorProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Uses an already loaded mapping set.
    pub fn mappings(mut self, mappings: MappingSet) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Loads the mappings from `source` at build time.
    pub fn mappings_source(mut self, source: MappingsSource) -> Self {
        self.source = source;
        self.mappings = None;
        self
    }

    /// Builds the config, loading mappings if none were supplied.
    pub fn build(self) -> std::result::Result<MapperConfig, ConfigError> {
        let mappings = match self.mappings {
            Some(m) => m,
            None => MappingsLoader::new().load(&self.source)?,
        };

        let registry = self
            .providers
            .into_iter()
            .fold(ProviderRegistry::new(mappings), |r, p| r.with_shared_provider(p));

        Ok(MapperConfig {
            name: self.name,
            id_field: self.id_field,
            default_intent: self
                .default_intent
                .unwrap_or_else(|| DEFAULT_INTENT.to_string()),
            registry,
        })
    }
}

/// Maps application fields to index field names and values.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    config: Arc<MapperConfig>,
}

impl FieldMapper {
    /// Creates a mapper over a config.
    pub fn new(config: Arc<MapperConfig>) -> Self {
        Self { config }
    }

    /// Creates a mapper over the embedded mappings.
    pub fn default_mapper() -> std::result::Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(MapperConfig::default_config()?)))
    }

    /// The config this mapper was built with.
    pub fn config(&self) -> &Arc<MapperConfig> {
        &self.config
    }

    /// Identifier field name.
    pub fn id_field(&self) -> &str {
        self.config.id_field()
    }

    /// The configuration-backed provider.
    pub fn mappings(&self) -> &Arc<MappingSet> {
        self.config.registry().mappings()
    }

    /// Intents the mappings flag as applying automatically.
    pub fn default_intents(&self) -> Vec<String> {
        self.mappings().default_intents()
    }

    /// Every intent this mapper can resolve.
    pub fn intents(&self) -> Vec<String> {
        self.config.registry().intents()
    }

    /// Output field name for one intent.
    pub fn resolve_name(
        &self,
        field_name: impl AsRef<str>,
        field_type: Option<&TypeTag>,
        intent: &str,
    ) -> Result<String> {
        let field_name = field_name.as_ref();
        let descriptor = self.descriptor_for(field_name, field_type, intent)?;
        Ok(descriptor.name_and_converter(field_name, field_type).name)
    }

    /// Output field name for the default intent.
    pub fn solr_name(&self, field_name: impl AsRef<str>, field_type: Option<&TypeTag>) -> Result<String> {
        self.resolve_name(field_name, field_type, self.config.default_intent())
    }

    /// Computes the index fields for a value under each intent.
    ///
    /// Intents are processed in order. Values landing on an output name
    /// that already holds an equal value are dropped. An output name is
    /// present even when its converter produced no values. Any failure
    /// aborts the whole computation.
    pub fn compute<S: AsRef<str>>(
        &self,
        field_name: impl AsRef<str>,
        value: &FieldValue,
        field_type: Option<&TypeTag>,
        intents: &[S],
    ) -> Result<FieldSet> {
        let field_name = field_name.as_ref();
        let mut fields = FieldSet::new();

        for intent in intents {
            let intent = intent.as_ref();
            let descriptor = self.descriptor_for(field_name, field_type, intent)?;
            let named = descriptor.name_and_converter(field_name, field_type);
            let converted = named.converter.apply(value, field_name)?;

            trace!(
                field = field_name,
                intent,
                output = %named.name,
                values = converted.len(),
                "resolved intent"
            );

            let entry = fields.entry(named.name).or_default();
            for v in converted {
                if !entry.contains(&v) {
                    entry.push(v);
                }
            }
        }

        Ok(fields)
    }

    fn descriptor_for(
        &self,
        field_name: &str,
        field_type: Option<&TypeTag>,
        intent: &str,
    ) -> Result<Arc<dyn Descriptor>> {
        let descriptor = self.config.registry().find_descriptor(intent)?;
        if !descriptor.accepts_type(field_type) {
            return Err(MapperError::InvalidIndexDescriptor {
                intent: intent.to_string(),
                field_name: field_name.to_string(),
            });
        }
        Ok(descriptor)
    }
}

/// Mapper configs by type name.
///
/// Reloading one type replaces that entry only.
#[derive(Debug, Default)]
pub struct MapperCatalog {
    configs: RwLock<HashMap<String, Arc<MapperConfig>>>,
}

impl MapperCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the default mapper.
    pub fn with_defaults() -> std::result::Result<Self, ConfigError> {
        let catalog = Self::new();
        catalog.register(MapperConfig::default_config()?);
        Ok(catalog)
    }

    /// Registers a config under its name, replacing any earlier one.
    pub fn register(&self, config: MapperConfig) -> Arc<MapperConfig> {
        let config = Arc::new(config);
        self.configs
            .write()
            .insert(config.name().to_string(), Arc::clone(&config));
        config
    }

    /// Returns the current config for a mapper type.
    pub fn get(&self, name: &str) -> Option<Arc<MapperConfig>> {
        self.configs.read().get(name).cloned()
    }

    /// Creates a mapper from the current config for a mapper type.
    pub fn mapper(&self, name: &str) -> Option<FieldMapper> {
        self.get(name).map(FieldMapper::new)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.configs.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Replaces the mappings of one mapper type.
    ///
    /// An unregistered type is registered with the loaded mappings and no
    /// custom providers. Reloads hold the catalog's upgradable read lock
    /// from lookup to swap, so two reloads never interleave; readers are
    /// only blocked for the swap itself.
    pub fn load_mappings(
        &self,
        name: &str,
        source: &MappingsSource,
    ) -> std::result::Result<Arc<MapperConfig>, ConfigError> {
        let configs = self.configs.upgradable_read();
        let config = match configs.get(name) {
            Some(current) => {
                let config = current.reloaded(source)?;
                debug!(
                    mapper = name,
                    source = %source.label(),
                    "replaced mapper configuration"
                );
                config
            }
            None => {
                warn!(
                    mapper = name,
                    source = %source.label(),
                    "loading mappings for unregistered mapper type"
                );
                MapperConfig::builder(name)
                    .mappings_source(source.clone())
                    .build()?
            }
        };

        let config = Arc::new(config);
        RwLockUpgradableReadGuard::upgrade(configs).insert(name.to_string(), Arc::clone(&config));
        Ok(config)
    }
}
