//! Descriptor providers and the provider registry.
//!
//! A provider is a named source of intent → descriptor bindings. The
//! [`ProviderRegistry`] keeps providers in precedence order: the first
//! provider that defines an intent wins. A derived mapper lists its own
//! providers ahead of the ones it inherits, overriding a subset of intents
//! without touching the shared set.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::descriptor::{Descriptor, FlagDescriptor, IndexFlag, TableDescriptor};
use crate::error::{MapperError, Result};

/// A named source of intent → descriptor bindings.
pub trait DescriptorProvider: Send + Sync + std::fmt::Debug {
    /// Name shown in diagnostics.
    fn name(&self) -> &str;

    /// Returns the descriptor for `intent`, if this provider defines it.
    fn descriptor(&self, intent: &str) -> Option<Arc<dyn Descriptor>>;

    /// Intents defined by this provider, in declaration order.
    fn intents(&self) -> Vec<String>;
}

/// An ordered, named set of descriptors.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    name: String,
    descriptors: IndexMap<String, Arc<dyn Descriptor>>,
}

impl DescriptorSet {
    /// Creates an empty set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptors: IndexMap::new(),
        }
    }

    /// Binds an intent to a descriptor, replacing any earlier binding.
    pub fn with(mut self, intent: impl Into<String>, descriptor: impl Descriptor + 'static) -> Self {
        self.insert(intent, Arc::new(descriptor));
        self
    }

    /// Binds an intent to a shared descriptor.
    pub fn insert(&mut self, intent: impl Into<String>, descriptor: Arc<dyn Descriptor>) {
        self.descriptors.insert(intent.into(), descriptor);
    }

    /// Returns the descriptor bound to `intent`.
    pub fn get(&self, intent: &str) -> Option<&Arc<dyn Descriptor>> {
        self.descriptors.get(intent)
    }

    /// Returns the number of bound intents.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if no intents are bound.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Iterates over bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Descriptor>)> {
        self.descriptors.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl DescriptorProvider for DescriptorSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self, intent: &str) -> Option<Arc<dyn Descriptor>> {
        self.descriptors.get(intent).cloned()
    }

    fn intents(&self) -> Vec<String> {
        self.descriptors.keys().cloned().collect()
    }
}

/// Descriptors materialized from a mapping file, plus its identifier field.
///
/// Every loaded descriptor is a [`TableDescriptor`], so callers can inspect
/// the per-type rules and options that were loaded. Built-in descriptors
/// answer for intents the file does not define.
#[derive(Debug, Clone)]
pub struct MappingSet {
    name: String,
    id_field: Option<String>,
    mappings: IndexMap<String, Arc<TableDescriptor>>,
    builtins: IndexMap<String, Arc<dyn Descriptor>>,
}

impl MappingSet {
    /// Name used for the configuration-backed provider.
    pub const DEFAULT_NAME: &'static str = "DefaultDescriptors";

    /// Built-in intent naming a field by its type code plus `i`.
    pub const SIMPLE: &'static str = "simple";

    /// Creates an empty mapping set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_field: None,
            mappings: IndexMap::new(),
            builtins: IndexMap::new(),
        }
    }

    /// Adds the built-in descriptors: `simple` (type code plus `i`).
    pub fn with_builtin_descriptors(self) -> Self {
        self.with_builtin(Self::SIMPLE, FlagDescriptor::new([IndexFlag::Indexed]))
    }

    /// Binds a built-in intent. Loaded mappings of the same name win.
    pub fn with_builtin(mut self, intent: impl Into<String>, descriptor: impl Descriptor + 'static) -> Self {
        self.builtins.insert(intent.into(), Arc::new(descriptor));
        self
    }

    /// Returns the built-in descriptor for `intent`.
    pub fn builtin(&self, intent: &str) -> Option<&Arc<dyn Descriptor>> {
        self.builtins.get(intent)
    }

    /// Sets the identifier field declared by the mapping file.
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = Some(id_field.into());
        self
    }

    /// Binds an intent.
    pub fn with(mut self, intent: impl Into<String>, descriptor: TableDescriptor) -> Self {
        self.mappings.insert(intent.into(), Arc::new(descriptor));
        self
    }

    /// Identifier field declared by the mapping file, if any.
    pub fn id_field(&self) -> Option<&str> {
        self.id_field.as_deref()
    }

    /// Returns the descriptor for `intent`.
    pub fn get(&self, intent: &str) -> Option<&Arc<TableDescriptor>> {
        self.mappings.get(intent)
    }

    /// Returns the number of intents.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if the set defines no intents.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Iterates over intents in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<TableDescriptor>)> {
        self.mappings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Intents flagged to apply automatically, in file order.
    pub fn default_intents(&self) -> Vec<String> {
        self.mappings
            .iter()
            .filter(|(_, d)| d.intent_options().default)
            .map(|(k, _)| k.clone())
            .collect()
    }
}

impl DescriptorProvider for MappingSet {
    fn name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self, intent: &str) -> Option<Arc<dyn Descriptor>> {
        self.mappings
            .get(intent)
            .map(|d| Arc::clone(d) as Arc<dyn Descriptor>)
            .or_else(|| self.builtins.get(intent).cloned())
    }

    fn intents(&self) -> Vec<String> {
        self.mappings
            .keys()
            .chain(self.builtins.keys().filter(|k| !self.mappings.contains_key(*k)))
            .cloned()
            .collect()
    }
}

/// Ordered providers searched first to last.
///
/// Custom providers come first; the configuration-backed [`MappingSet`] is
/// always searched last and can be replaced wholesale by a reload.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn DescriptorProvider>>,
    mappings: Arc<MappingSet>,
}

impl ProviderRegistry {
    /// Creates a registry holding only the given mappings.
    pub fn new(mappings: MappingSet) -> Self {
        Self {
            providers: Vec::new(),
            mappings: Arc::new(mappings),
        }
    }

    /// Appends a provider after those already registered and ahead of the
    /// mappings.
    pub fn with_provider(mut self, provider: impl DescriptorProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Appends a shared provider.
    pub fn with_shared_provider(mut self, provider: Arc<dyn DescriptorProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Returns a copy with the mappings replaced; custom providers are kept.
    pub fn with_mappings(&self, mappings: MappingSet) -> Self {
        Self {
            providers: self.providers.clone(),
            mappings: Arc::new(mappings),
        }
    }

    /// The configuration-backed provider.
    pub fn mappings(&self) -> &Arc<MappingSet> {
        &self.mappings
    }

    /// All providers in search order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn DescriptorProvider> {
        self.providers
            .iter()
            .map(|p| p.as_ref())
            .chain(std::iter::once(self.mappings.as_ref() as &dyn DescriptorProvider))
    }

    /// Provider names in search order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers().map(|p| p.name().to_string()).collect()
    }

    /// Resolves an intent to the first descriptor that defines it.
    ///
    /// Fails with [`MapperError::UnknownIndexMacro`] naming every provider
    /// consulted when none does.
    pub fn find_descriptor(&self, intent: &str) -> Result<Arc<dyn Descriptor>> {
        self.providers()
            .find_map(|p| p.descriptor(intent))
            .ok_or_else(|| MapperError::UnknownIndexMacro {
                intent: intent.to_string(),
                providers: self.provider_names(),
            })
    }

    /// Every intent any provider defines, deduplicated, in search order.
    pub fn intents(&self) -> Vec<String> {
        let mut seen = indexmap::IndexSet::new();
        for provider in self.providers() {
            seen.extend(provider.intents());
        }
        seen.into_iter().collect()
    }
}
