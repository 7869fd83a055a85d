//! Negative tests for malformed JSON Schemas.
//!
//! Every input is valid JSON but invalid (or unsupported) schema semantics.
//! The public entry points must return a typed error carrying a JSON-pointer
//! path, and must never panic.
//!
//! Complements `fuzz/fuzz_targets/fuzz_extends.rs`, which covers arbitrary
//! bytes → JSON parse → `schema_extends()`.

use jsonschema_compat_core::{schema_extends, CompareOptions, CompatError, ErrorCode};
use proptest::prelude::*;
use serde_json::{json, Value};

fn default_opts() -> CompareOptions {
    CompareOptions::default()
}

fn check_error(schema: Value) -> CompatError {
    schema_extends(&schema, &json!({}), &default_opts())
        .expect_err("malformed schema should be rejected")
}

// ===========================================================================
// 1. Deterministic negative tests: known malformed schemas
// ===========================================================================

/// `required` must be an array, not a string.
#[test]
fn malformed_required_as_string() {
    let err = check_error(json!({
        "type": "object",
        "properties": { "name": { "type": "string" } },
        "required": "not_an_array"
    }));
    assert_eq!(err.error_code(), ErrorCode::InvalidSchema);
    assert_eq!(err.path(), Some("#/required"));
}

/// `anyOf` must be an array, not an object.
#[test]
fn malformed_anyof_as_object() {
    let err = check_error(json!({ "anyOf": { "not": "an_array" } }));
    assert_eq!(err.error_code(), ErrorCode::InvalidSchema);
    assert_eq!(err.path(), Some("#/anyOf"));
}

/// `oneOf` is refused whatever its shape.
#[test]
fn unsupported_oneof() {
    let err = check_error(json!({ "oneOf": "not_an_array" }));
    assert_eq!(err.error_code(), ErrorCode::UnsupportedFeature);
    assert_eq!(err.path(), Some("#/oneOf"));
}

/// `properties` must be an object, not a string.
#[test]
fn malformed_properties_as_string() {
    let err = check_error(json!({ "type": "object", "properties": "a_string" }));
    assert_eq!(err.path(), Some("#/properties"));
}

/// `type` must be a string (or array of strings), not a number.
#[test]
fn malformed_type_as_number() {
    let err = check_error(json!({ "type": 42 }));
    assert_eq!(err.error_code(), ErrorCode::InvalidSchema);
    assert_eq!(err.path(), Some("#/type"));
}

#[test]
fn malformed_type_array_entry() {
    let err = check_error(json!({ "type": ["string", 7] }));
    assert_eq!(err.path(), Some("#/type/1"));
}

/// `items` must be a schema (object/boolean), not a number.
#[test]
fn malformed_items_as_number() {
    let err = check_error(json!({ "type": "array", "items": 42 }));
    assert_eq!(err.error_code(), ErrorCode::InvalidSchema);
    assert_eq!(err.path(), Some("#/items"));
}

/// `enum` must be an array, not a string.
#[test]
fn malformed_enum_as_string() {
    let err = check_error(json!({ "type": "string", "enum": "not_an_array" }));
    assert_eq!(err.path(), Some("#/enum"));
}

/// `$ref` must be a string, not a number.
#[test]
fn malformed_ref_as_number() {
    let err = check_error(json!({ "$ref": 42 }));
    assert_eq!(err.error_code(), ErrorCode::ParserError);
}

/// `allOf` must be an array, not an object.
#[test]
fn malformed_allof_as_object() {
    let err = check_error(json!({ "allOf": { "type": "string" } }));
    assert_eq!(err.path(), Some("#/allOf"));
}

/// `additionalProperties` must be a boolean or a schema.
#[test]
fn malformed_additional_properties_as_array() {
    let err = check_error(json!({ "type": "object", "additionalProperties": [1, 2] }));
    assert_eq!(err.path(), Some("#/additionalProperties"));
}

/// Errors deep in the tree report the full path.
#[test]
fn malformed_nested_property() {
    let err = check_error(json!({
        "type": "object",
        "properties": {
            "outer": {
                "type": "object",
                "properties": {
                    "inner": { "type": "array", "items": { "type": "strng" } }
                }
            }
        }
    }));
    assert_eq!(
        err.path(),
        Some("#/properties/outer/properties/inner/items/type")
    );
}

#[test]
fn malformed_unresolvable_ref() {
    let err = check_error(json!({ "$ref": "#/definitions/DoesNotExist" }));
    assert!(err.is_reference_error());
}

#[test]
fn unsupported_conditional_keywords() {
    for keyword in ["if", "then", "else", "propertyNames", "patternProperties", "additionalItems"] {
        let mut schema = json!({ "type": "object" });
        schema[keyword] = json!({});
        let err = check_error(schema);
        assert_eq!(err.error_code(), ErrorCode::UnsupportedFeature, "{}", keyword);
        assert_eq!(err.path(), Some(format!("#/{}", keyword).as_str()));
    }
}

#[test]
fn malformed_null_schema() {
    let err = check_error(json!(null));
    assert_eq!(err.error_code(), ErrorCode::ParserError);
}

#[test]
fn malformed_string_schema() {
    let err = check_error(json!("just a string"));
    assert_eq!(err.error_code(), ErrorCode::ParserError);
}

#[test]
fn malformed_deeply_nested() {
    let mut schema = json!({ "type": "string" });
    for _ in 0..100 {
        schema = json!({ "type": "array", "items": schema });
    }
    let err = check_error(schema);
    assert_eq!(err.error_code(), ErrorCode::RecursionDepthExceeded);
}

#[test]
fn edge_case_boolean_schemas_are_valid() {
    assert!(schema_extends(&json!(false), &json!(true), &default_opts())
        .unwrap()
        .extends);
    assert!(!schema_extends(&json!(true), &json!(false), &default_opts())
        .unwrap()
        .extends);
}

// ===========================================================================
// 2. Property-based negative tests: proptest strategies
// ===========================================================================

/// Strategy: a JSON Schema keyword with the wrong value type.
fn arb_malformed_keyword() -> impl Strategy<Value = (&'static str, Value)> {
    prop_oneof![
        Just(("required", json!("not_an_array"))),
        Just(("required", json!(42))),
        Just(("required", json!({"key": "value"}))),
        Just(("properties", json!("not_an_object"))),
        Just(("properties", json!(["a", "b"]))),
        Just(("type", json!(42))),
        Just(("type", json!([1, 2, 3]))),
        Just(("type", json!(null))),
        Just(("type", json!("strnig"))),
        Just(("allOf", json!({"type": "string"}))),
        Just(("anyOf", json!("bad"))),
        Just(("oneOf", json!(true))),
        Just(("items", json!(99))),
        Just(("items", json!("bad"))),
        Just(("enum", json!("bad"))),
        Just(("$ref", json!(42))),
        Just(("$ref", json!(["a", "b"]))),
        Just(("$ref", json!("#/nowhere"))),
        Just(("additionalProperties", json!([1, 2]))),
        Just(("additionalProperties", json!("bad"))),
        Just(("not", json!(7))),
    ]
}

/// Strategy: a malformed schema with 1-3 wrong keywords, optionally nested
/// under a property.
fn arb_malformed_schema() -> impl Strategy<Value = Value> {
    (
        proptest::collection::vec(arb_malformed_keyword(), 1..=3),
        any::<bool>(),
    )
        .prop_map(|(keywords, nested)| {
            let mut obj = serde_json::Map::new();
            for (key, value) in keywords {
                obj.insert(key.to_string(), value);
            }
            let schema = Value::Object(obj);
            if nested {
                json!({ "type": "object", "properties": { "field": schema } })
            } else {
                schema
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, ..Default::default() })]

    /// `schema_extends()` never panics on malformed schemas.
    #[test]
    fn extends_never_panics_on_malformed(schema in arb_malformed_schema()) {
        let _ = schema_extends(&schema, &schema, &default_opts());
    }

    /// Errors carry a non-empty message and, except for JSON errors, a path
    /// rooted at `#`.
    #[test]
    fn errors_have_messages_and_paths(schema in arb_malformed_schema()) {
        if let Err(e) = schema_extends(&schema, &json!({}), &default_opts()) {
            prop_assert!(!e.to_string().is_empty());
            let path = e.path();
            prop_assert!(path.is_some_and(|p| p.starts_with('#')), "{:?}", path);
        }
    }
}
