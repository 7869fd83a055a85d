//! IR → JSON Schema emission.

use serde_json::{json, Map, Value};

use super::Schema;

/// Emit a JSON Schema (Draft-07 subset) describing the same values as `schema`.
pub fn to_json_schema(schema: &Schema) -> Value {
    match schema {
        Schema::Null => json!({ "type": "null" }),
        Schema::Undefined => json!({ "not": {} }),
        Schema::Unknown => json!({}),
        Schema::String(None) => json!({ "type": "string" }),
        Schema::String(Some(value)) => json!({ "type": "string", "const": value }),
        Schema::Number(None) => json!({ "type": "number" }),
        Schema::Number(Some(value)) => json!({ "type": "number", "const": number_value(*value) }),
        Schema::Boolean(None) => json!({ "type": "boolean" }),
        Schema::Boolean(Some(value)) => json!({ "type": "boolean", "const": value }),
        Schema::Union(members) => {
            json!({ "anyOf": members.iter().map(to_json_schema).collect::<Vec<_>>() })
        }
        Schema::Intersection(members) => {
            json!({ "allOf": members.iter().map(to_json_schema).collect::<Vec<_>>() })
        }
        Schema::Array(items) => json!({ "type": "array", "items": to_json_schema(items) }),
        Schema::Tuple(items) => {
            json!({ "type": "array", "items": items.iter().map(to_json_schema).collect::<Vec<_>>() })
        }
        Schema::Map(items) => {
            json!({ "type": "object", "additionalProperties": to_json_schema(items) })
        }
        Schema::Object(properties) => {
            let mut emitted = Map::new();
            let mut required = Vec::new();
            for (key, value) in properties {
                if value.is_optional() {
                    emitted.insert(key.clone(), emit_optional(value));
                } else {
                    required.push(Value::String(key.clone()));
                    emitted.insert(key.clone(), to_json_schema(value));
                }
            }
            json!({ "type": "object", "properties": emitted, "required": required })
        }
    }
}

/// An optional property without its `Undefined` branch; absence from
/// `required` already says the key may be missing.
fn emit_optional(schema: &Schema) -> Value {
    let Schema::Union(members) = schema else {
        return to_json_schema(schema);
    };
    let mut present: Vec<&Schema> = members
        .iter()
        .filter(|m| !matches!(m, Schema::Undefined))
        .collect();

    match present.len() {
        0 => to_json_schema(schema),
        1 => to_json_schema(present.remove(0)),
        _ => json!({ "anyOf": present.into_iter().map(to_json_schema).collect::<Vec<_>>() }),
    }
}

/// Integral values are emitted as JSON integers.
fn number_value(value: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        json!(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareOptions;
    use crate::ir::from_json_schema;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_nullary_and_primitives() {
        assert_eq!(to_json_schema(&Schema::Undefined), json!({ "not": {} }));
        assert_eq!(to_json_schema(&Schema::Unknown), json!({}));
        assert_eq!(to_json_schema(&Schema::Null), json!({ "type": "null" }));
        assert_eq!(to_json_schema(&Schema::string()), json!({ "type": "string" }));
        assert_eq!(
            to_json_schema(&Schema::literal("banana")),
            json!({ "type": "string", "const": "banana" })
        );
        assert_eq!(
            to_json_schema(&Schema::literal(true)),
            json!({ "type": "boolean", "const": true })
        );
    }

    #[test]
    fn test_emit_integral_numbers_as_integers() {
        assert_eq!(
            to_json_schema(&Schema::literal(42)),
            json!({ "type": "number", "const": 42 })
        );
        assert_eq!(
            to_json_schema(&Schema::literal(1.5)),
            json!({ "type": "number", "const": 1.5 })
        );
    }

    #[test]
    fn test_emit_containers() {
        assert_eq!(
            to_json_schema(&Schema::array(Schema::string())),
            json!({ "type": "array", "items": { "type": "string" } })
        );
        assert_eq!(
            to_json_schema(&Schema::tuple([Schema::string(), Schema::Null])),
            json!({ "type": "array", "items": [{ "type": "string" }, { "type": "null" }] })
        );
        assert_eq!(
            to_json_schema(&Schema::map(Schema::number())),
            json!({ "type": "object", "additionalProperties": { "type": "number" } })
        );
        assert_eq!(
            to_json_schema(&Schema::intersection([Schema::Unknown, Schema::Null])),
            json!({ "allOf": [{}, { "type": "null" }] })
        );
    }

    #[test]
    fn test_emit_object_strips_undefined_from_optional_properties() {
        let schema = Schema::object([
            ("a", Schema::string()),
            ("b", Schema::optional(Schema::number())),
            ("c", Schema::union([Schema::string(), Schema::Null, Schema::Undefined])),
        ]);
        assert_eq!(
            to_json_schema(&schema),
            json!({
                "type": "object",
                "properties": {
                    "a": { "type": "string" },
                    "b": { "type": "number" },
                    "c": { "anyOf": [{ "type": "string" }, { "type": "null" }] }
                },
                "required": ["a"]
            })
        );
    }

    #[test]
    fn test_emit_union_of_only_undefined_is_kept() {
        let schema = Schema::object([("gone", Schema::union([Schema::Undefined]))]);
        assert_eq!(
            to_json_schema(&schema),
            json!({
                "type": "object",
                "properties": { "gone": { "anyOf": [{ "not": {} }] } },
                "required": []
            })
        );
    }

    #[test]
    fn test_emitted_object_ingests_back() {
        let schema = Schema::object([
            ("id", Schema::string()),
            ("tags", Schema::optional(Schema::array(Schema::string()))),
        ]);
        let emitted = to_json_schema(&schema);
        let ingested = from_json_schema(&emitted, &CompareOptions::default()).unwrap();
        assert_eq!(ingested, schema);
    }
}
