//! # Field error resolution against the real validator
//!
//! Exercises `CompiledSchema::check` end to end so the resolution rule is
//! tested against the message and path formats the `jsonschema` crate
//! actually produces.

use std::collections::BTreeSet;

use jsonguard_schema::{CompiledSchema, FieldErrorMap};
use proptest::prelude::*;
use serde_json::{json, Value};

fn profile_schema() -> CompiledSchema {
    CompiledSchema::compile(json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "email": {"type": "string"},
            "city": {"type": "string"}
        },
        "required": ["name", "email"]
    }))
    .unwrap()
}

fn keys(errors: &FieldErrorMap) -> BTreeSet<String> {
    errors.fields().map(str::to_string).collect()
}

#[test]
fn missing_required_fields_are_named() {
    let errors = profile_schema().check(&json!({"city": "Oslo"})).unwrap_err();
    assert_eq!(
        keys(&errors),
        BTreeSet::from(["name".to_string(), "email".to_string()])
    );
}

#[test]
fn wrong_type_is_keyed_by_property() {
    let errors = profile_schema()
        .check(&json!({"name": "Ada", "email": 7}))
        .unwrap_err();
    assert_eq!(keys(&errors), BTreeSet::from(["email".to_string()]));
    assert_eq!(errors.get("email").unwrap().len(), 1);
}

#[test]
fn non_object_body_is_keyed_by_type_keyword() {
    let errors = profile_schema().check(&json!(123)).unwrap_err();
    assert!(errors.get("type").is_some(), "got: {:?}", keys(&errors));
}

#[test]
fn additional_properties_are_keyed_by_keyword() {
    let schema = CompiledSchema::compile(json!({
        "type": "object",
        "properties": {"text": {"type": "string"}},
        "required": ["text"],
        "additionalProperties": false
    }))
    .unwrap();
    let errors = schema.check(&json!({"nottext": "foobar"})).unwrap_err();
    assert!(!errors.is_empty());
    assert!(errors.get("text").is_some());
    assert!(errors.get("additionalProperties").is_some());
}

#[test]
fn false_schema_reports_root() {
    let schema = CompiledSchema::compile(Value::Bool(false)).unwrap();
    let errors = schema.check(&json!({"anything": 1})).unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![jsonguard_schema::ROOT_FIELD]);
}

fn field_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{0,12}".prop_map(Value::String),
        any::<i64>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(Value::Bool),
    ]
}

proptest! {
    /// The reported fields are exactly the properties whose values have the
    /// wrong type plus the required properties that are absent.
    #[test]
    fn reported_fields_match_implicated_properties(
        name in proptest::option::of(field_value()),
        email in proptest::option::of(field_value()),
        city in proptest::option::of(field_value()),
    ) {
        let mut body = serde_json::Map::new();
        let mut expected = BTreeSet::new();
        for (field, value, required) in [("name", name, true), ("email", email, true), ("city", city, false)] {
            match value {
                Some(v) => {
                    if !v.is_string() {
                        expected.insert(field.to_string());
                    }
                    body.insert(field.to_string(), v);
                }
                None if required => {
                    expected.insert(field.to_string());
                }
                None => {}
            }
        }

        match profile_schema().check(&Value::Object(body)) {
            Ok(()) => prop_assert!(expected.is_empty()),
            Err(errors) => prop_assert_eq!(keys(&errors), expected),
        }
    }
}
