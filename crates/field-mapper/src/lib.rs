//! Helios Field Mapper
//!
//! Maps application fields to the concrete field names and values a search
//! index expects. A field is described by a name, an optional data type and
//! one or more index intents (`searchable`, `sortable`, `facetable`, ...).
//! Each intent resolves to a descriptor that picks an output name suffix and
//! a value converter, possibly depending on the data type.
//!
//! # Architecture
//!
//! - [`types`] - Data type tags
//! - [`value`] - Raw and converted field values
//! - [`dates`] - Date normalization to canonical timestamps
//! - [`converter`] - Arity-tagged value converters
//! - [`descriptor`] - Descriptors and type override tables
//! - [`provider`] - Descriptor providers and the ordered provider registry
//! - [`loader`] - Mapping file loader
//! - [`mapper`] - Mapper configs, the field mapper and the per-type catalog
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use helios_field_mapper::{FieldMapper, FieldValue, TypeTag};
//!
//! let mapper = FieldMapper::default_mapper()?;
//!
//! let fields = mapper.compute(
//!     "title",
//!     &FieldValue::text("Moby Dick"),
//!     Some(&TypeTag::String),
//!     &["searchable", "sortable"],
//! )?;
//!
//! assert_eq!(fields["title_tesim"], vec![FieldValue::text("Moby Dick")]);
//! assert_eq!(fields["title_ssi"], vec![FieldValue::text("Moby Dick")]);
//!
//! // Without an intent, the type code plus `i`.
//! assert_eq!(mapper.solr_name("title", Some(&TypeTag::String))?, "title_si");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Overriding intents
//!
//! A mapper type lists custom providers ahead of its mappings. The first
//! provider that defines an intent wins, so a derived mapper can override a
//! few intents, or a few data types of one intent, and inherit the rest:
//!
//! ```no_run
//! use std::sync::Arc;
//! use helios_field_mapper::{
//!     DescriptorSet, FieldMapper, MapperConfig, Rule, TableDescriptor, TypeTable, TypeTag,
//! };
//!
//! let base = MapperConfig::default_config()?;
//! let sortable = base.registry().mappings().get("stored_sortable").unwrap().table().clone();
//!
//! let overrides = DescriptorSet::new("Overrides").with(
//!     "stored_sortable",
//!     TableDescriptor::new(TypeTable::derive(sortable).with_type(TypeTag::Date, Rule::suffix("_d"))),
//! );
//! let config = MapperConfig::builder("Custom").provider(overrides).build()?;
//! let mapper = FieldMapper::new(Arc::new(config));
//!
//! assert_eq!(mapper.resolve_name("foo", Some(&TypeTag::Date), "stored_sortable")?, "foo_d");
//! assert_eq!(mapper.resolve_name("foo", Some(&TypeTag::String), "stored_sortable")?, "foo_ssi");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod converter;
pub mod dates;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod provider;
pub mod types;
pub mod value;

pub use converter::{Arity, Converter};
pub use descriptor::{
    DerivedDescriptor, Descriptor, FlagDescriptor, FnDescriptor, IndexFlag, IntentOptions,
    NamedConverter, Rule, TableDescriptor, TypeTable,
};
pub use error::{ConfigError, ConversionError, MapperError, Result};
pub use loader::{MappingsLoader, MappingsSource};
pub use mapper::{FieldMapper, FieldSet, MapperCatalog, MapperConfig, MapperConfigBuilder};
pub use provider::{DescriptorProvider, DescriptorSet, MappingSet, ProviderRegistry};
pub use types::TypeTag;
pub use value::{Converted, FieldValue};
