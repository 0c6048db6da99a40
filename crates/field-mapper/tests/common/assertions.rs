//! Assertion helpers for computed field sets.

use helios_field_mapper::{FieldSet, FieldValue};

/// Asserts that a field set holds exactly `expected`, in order.
///
/// # Panics
///
/// Panics if names, values or their order differ.
pub fn assert_fields(actual: &FieldSet, expected: &[(&str, &[&str])]) {
    let actual: Vec<(String, Vec<FieldValue>)> = actual
        .iter()
        .map(|(name, values)| (name.clone(), values.clone()))
        .collect();
    let expected: Vec<(String, Vec<FieldValue>)> = expected
        .iter()
        .map(|(name, values)| {
            (
                name.to_string(),
                values.iter().map(|v| FieldValue::text(*v)).collect(),
            )
        })
        .collect();
    assert_eq!(actual, expected, "Field set mismatch");
}
