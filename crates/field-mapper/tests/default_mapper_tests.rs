//! Behavior of the default mapper over the embedded mappings.

mod common;

use chrono::NaiveDate;
use common::*;
use helios_field_mapper::{FieldMapper, FieldValue, MapperError, TypeTag};

fn mapper() -> FieldMapper {
    FieldMapper::default_mapper().unwrap()
}

#[test]
fn test_id_field_is_id() {
    assert_eq!(mapper().id_field(), "id");
}

#[test]
fn test_no_intents_no_fields() {
    let none: &[&str] = &[];
    let mapper = mapper();
    assert!(
        mapper
            .compute("foo", &FieldValue::text("bar"), Some(&TypeTag::String), none)
            .unwrap()
            .is_empty()
    );
    assert!(
        mapper
            .compute("foo", &FieldValue::text("1"), Some(&TypeTag::Integer), none)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_full_iso8601_dates() {
    let mapper = mapper();
    let date = |value: FieldValue| {
        mapper
            .compute("foo", &value, Some(&TypeTag::Date), &["searchable"])
            .unwrap()
    };

    assert_fields(&date(FieldValue::text("2012-11-06")), &[("foo_dtsi", &["2012-11-06T00:00:00Z"])]);
    assert_fields(
        &date(FieldValue::text("November 6th, 2012")),
        &[("foo_dtsi", &["2012-11-06T00:00:00Z"])],
    );
    assert_fields(
        &date(FieldValue::Date(NaiveDate::from_ymd_opt(2012, 11, 6).unwrap())),
        &[("foo_dtsi", &["2012-11-06T00:00:00Z"])],
    );
    assert_fields(&date(FieldValue::text("")), &[("foo_dtsi", &[])]);
}

#[test]
fn test_displayable_facetable_sortable_unstemmed() {
    let fields = mapper()
        .compute(
            "foo",
            &FieldValue::text("bar"),
            Some(&TypeTag::String),
            &["searchable", "displayable", "facetable", "sortable", "unstemmed_searchable"],
        )
        .unwrap();
    assert_fields(
        &fields,
        &[
            ("foo_tesim", &["bar"]),
            ("foo_sim", &["bar"]),
            ("foo_ssi", &["bar"]),
            ("foo_tim", &["bar"]),
        ],
    );
}

#[test]
fn test_type_specific_searchable_suffixes() {
    let mapper = mapper();
    let name = |ty: TypeTag| mapper.resolve_name("foo", Some(&ty), "searchable").unwrap();
    assert_eq!(name(TypeTag::Integer), "foo_isim");
    assert_eq!(name(TypeTag::Boolean), "foo_bsi");
    assert_eq!(name(TypeTag::Symbol), "foo_ssim");
    assert_eq!(name(TypeTag::from("garble")), "foo_tesim");
}

#[test]
fn test_missing_type_with_type_sensitive_intent() {
    let err = mapper().resolve_name("heifer", None, "searchable").unwrap_err();
    assert!(matches!(
        err,
        MapperError::InvalidIndexDescriptor { ref intent, ref field_name }
            if intent == "searchable" && field_name == "heifer"
    ));
}

#[test]
fn test_no_default_intents_in_embedded_mappings() {
    assert!(mapper().default_intents().is_empty());
}

#[test]
fn test_solr_name_default_intent() {
    let mapper = mapper();
    assert_eq!(mapper.solr_name("foo", Some(&TypeTag::String)).unwrap(), "foo_si");
    assert_eq!(
        mapper
            .solr_name("active_fedora_model", Some(&TypeTag::Symbol))
            .unwrap(),
        "active_fedora_model_si"
    );
    assert_eq!(mapper.solr_name("foo", Some(&TypeTag::Date)).unwrap(), "foo_dti");

    for field_type in [None, Some(TypeTag::from("garble"))] {
        match mapper.solr_name("foo", field_type.as_ref()).unwrap_err() {
            MapperError::InvalidIndexDescriptor { intent, field_name } => {
                assert_eq!(intent, "simple");
                assert_eq!(field_name, "foo");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

#[test]
fn test_simple_intent_normalizes_dates() {
    let fields = mapper()
        .compute(
            "foo",
            &FieldValue::text("November 6th, 2012"),
            Some(&TypeTag::Date),
            &["simple", "searchable"],
        )
        .unwrap();
    assert_fields(
        &fields,
        &[
            ("foo_dti", &["2012-11-06T00:00:00Z"]),
            ("foo_dtsi", &["2012-11-06T00:00:00Z"]),
        ],
    );
}
