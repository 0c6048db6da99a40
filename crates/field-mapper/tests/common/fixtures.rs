//! Test mapper types.
//!
//! `TestMapper0` puts a hand-written provider ahead of the default mappings
//! and renames the identifier field. `TestMapper1` derives from it,
//! overriding some data types of `fungible` and of the built-in `simple`
//! intent.

use std::path::PathBuf;
use std::sync::Arc;

use helios_field_mapper::{
    Converter, DerivedDescriptor, DescriptorSet, FieldMapper, FieldValue, FnDescriptor,
    MapperConfig, NamedConverter, Rule, TableDescriptor, TypeTable, TypeTag,
};

/// Path of the alternate mapping file.
pub fn test_mappings_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test_solr_mappings.yml")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn suffixed(suffix: &'static str) -> FnDescriptor {
    FnDescriptor::new(move |name, _| NamedConverter::name_only(format!("{}{}", name, suffix)))
}

/// Provider of `TestMapper0`.
pub fn descriptors0() -> DescriptorSet {
    DescriptorSet::new("Descriptors0")
        .with(
            "unstemmed_searchable",
            FnDescriptor::new(|name, ty| {
                let converter = if ty == Some(&TypeTag::Date) {
                    Converter::unary(|value| Ok(FieldValue::text(format!("{} o'clock", value)).into()))
                } else {
                    Converter::Identity
                };
                NamedConverter::new(format!("{}_s", name), converter)
            }),
        )
        .with("searchable", suffixed("_s"))
        .with("edible", suffixed("_food"))
        .with(
            "fungible",
            TableDescriptor::new(
                TypeTable::new(Rule::suffix("_f2"))
                    .with_type(TypeTag::Integer, Rule::suffix("_f1"))
                    .with_type(TypeTag::Date, Rule::suffix("_f0")),
            ),
        )
        .with(
            "laughable",
            FnDescriptor::new(|name, ty| {
                if ty == Some(&TypeTag::Integer) {
                    NamedConverter::new(
                        format!("{}_ihaha", name),
                        Converter::binary(|value, field_name| {
                            Ok(FieldValue::text(format!(
                                "How many {}s does it take to screw in a light bulb? {}.",
                                field_name,
                                capitalize(&value.to_string())
                            ))
                            .into())
                        }),
                    )
                } else {
                    NamedConverter::new(
                        format!("{}_haha", name),
                        Converter::unary(|value| {
                            let who = capitalize(&value.to_string());
                            Ok(FieldValue::text(format!(
                                "Knock knock. Who's there? {}. {} who?",
                                who, who
                            ))
                            .into())
                        }),
                    )
                }
            }),
        )
}

/// Provider of `TestMapper1`, layered over its parents' descriptors.
pub fn descriptors1(fungible: Arc<TypeTable>, simple: DerivedDescriptor) -> DescriptorSet {
    DescriptorSet::new("Descriptors1")
        .with(
            "fungible",
            TableDescriptor::new(
                TypeTable::derive(fungible)
                    .with_type("garble", Rule::suffix("_f4"))
                    .with_type(TypeTag::Integer, Rule::suffix("_f5")),
            ),
        )
        .with("simple", simple.with_type(TypeTag::Date, Rule::suffix("_d")))
}

/// `TestMapper0` config.
pub fn test_mapper0_config() -> MapperConfig {
    MapperConfig::builder("TestMapper0")
        .id_field("ident")
        .provider(descriptors0())
        .build()
        .expect("default mappings load")
}

/// `TestMapper1` config.
pub fn test_mapper1_config() -> MapperConfig {
    let base = test_mapper0_config();
    let d0 = Arc::new(descriptors0());

    let fungible = d0
        .get("fungible")
        .and_then(|d| d.type_table())
        .cloned()
        .expect("fungible is table-backed");
    let simple = base
        .registry()
        .find_descriptor("simple")
        .map(DerivedDescriptor::new)
        .expect("simple is built in");

    MapperConfig::builder("TestMapper1")
        .id_field("ident")
        .provider(descriptors1(fungible, simple))
        .shared_provider(d0)
        .build()
        .expect("default mappings load")
}

/// A `TestMapper0` instance.
pub fn test_mapper0() -> FieldMapper {
    FieldMapper::new(Arc::new(test_mapper0_config()))
}

/// A `TestMapper1` instance.
pub fn test_mapper1() -> FieldMapper {
    FieldMapper::new(Arc::new(test_mapper1_config()))
}
