//! JSON Schema → IR translation.
//!
//! Supports the Draft-07 subset `type`, `enum`, `const`, `items`,
//! `properties`, `required`, `additionalProperties`, `anyOf`, `allOf` and
//! `not`. Keywords that cannot be represented faithfully are rejected with a
//! path-annotated error rather than ignored.

use serde_json::{Map, Value};

use super::Schema;
use crate::config::CompareOptions;
use crate::error::CompatError;
use crate::schema_utils::build_path;

/// Keywords rejected outright.
const REJECTED_KEYWORDS: &[&str] = &[
    "oneOf",
    "additionalItems",
    "patternProperties",
    "propertyNames",
    "if",
    "then",
    "else",
];

/// Translate a dereferenced JSON Schema into IR.
///
/// The result is not normalized; see [`crate::passes::normalize`].
pub fn from_json_schema(schema: &Value, options: &CompareOptions) -> Result<Schema, CompatError> {
    let ingestor = Ingestor {
        max_depth: options.max_depth,
    };
    ingestor.ingest(schema, "#", 0)
}

struct Ingestor {
    max_depth: usize,
}

impl Ingestor {
    fn ingest(&self, schema: &Value, path: &str, depth: usize) -> Result<Schema, CompatError> {
        if depth > self.max_depth {
            return Err(CompatError::RecursionDepthExceeded {
                path: path.to_string(),
                max_depth: self.max_depth,
            });
        }

        let obj = match schema {
            Value::Bool(true) => return Ok(Schema::Unknown),
            Value::Bool(false) => return Ok(Schema::Undefined),
            Value::Object(obj) => obj,
            other => {
                return Err(CompatError::InvalidSchema {
                    path: path.to_string(),
                    message: format!("expected a schema object or boolean, found {}", other),
                })
            }
        };

        if let Some(reference) = obj.get("$ref") {
            return Err(CompatError::InvalidSchema {
                path: build_path(path, &["$ref"]),
                message: format!("unresolved $ref {}; dereference the schema first", reference),
            });
        }

        if let Some(keyword) = REJECTED_KEYWORDS.iter().copied().find(|k| obj.contains_key(*k)) {
            return Err(CompatError::UnsupportedFeature {
                path: build_path(path, &[keyword]),
                feature: keyword.to_string(),
            });
        }

        if let Some(not) = obj.get("not") {
            return self.ingest_not(not, path, depth);
        }

        match obj.get("type") {
            Some(Value::String(kind)) => self.ingest_typed(kind, obj, path, depth),
            Some(Value::Array(kinds)) => {
                let mut members = Vec::with_capacity(kinds.len());
                for (i, kind) in kinds.iter().enumerate() {
                    let Some(kind) = kind.as_str() else {
                        return Err(CompatError::InvalidSchema {
                            path: build_path(path, &["type", &i.to_string()]),
                            message: format!("type must be a string, found {}", kind),
                        });
                    };
                    members.push(self.ingest_typed(kind, obj, path, depth)?);
                }
                Ok(Schema::Union(members))
            }
            Some(other) => Err(CompatError::InvalidSchema {
                path: build_path(path, &["type"]),
                message: format!("type must be a string or an array, found {}", other),
            }),
            None => self.ingest_untyped(obj, path, depth),
        }
    }

    /// `not` is approximated: only the negations of `Unknown` and `Undefined`
    /// have an exact counterpart. Anything else widens to `Unknown`.
    fn ingest_not(&self, not: &Value, path: &str, depth: usize) -> Result<Schema, CompatError> {
        match not {
            Value::Bool(true) => Ok(Schema::Unknown),
            Value::Bool(false) => Ok(Schema::Undefined),
            inner => match self.ingest(inner, &build_path(path, &["not"]), depth + 1)? {
                Schema::Unknown => Ok(Schema::Undefined),
                negated => {
                    tracing::debug!(path, negated = %negated, "approximating `not` as unknown");
                    Ok(Schema::Unknown)
                }
            },
        }
    }

    fn ingest_typed(
        &self,
        kind: &str,
        obj: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> Result<Schema, CompatError> {
        match kind {
            "string" => primitive(obj, path, Schema::string(), |v| {
                v.as_str().map(|s| Schema::String(Some(s.to_string())))
            }),
            "number" | "integer" => primitive(obj, path, Schema::number(), |v| {
                v.as_f64().map(|n| Schema::Number(Some(n)))
            }),
            "boolean" => primitive(obj, path, Schema::boolean(), |v| {
                v.as_bool().map(|b| Schema::Boolean(Some(b)))
            }),
            "null" => Ok(Schema::Null),
            "array" => self.ingest_array(obj, path, depth),
            "object" => self.ingest_object(obj, path, depth),
            other => Err(CompatError::InvalidSchema {
                path: build_path(path, &["type"]),
                message: format!("unknown type \"{}\"", other),
            }),
        }
    }

    fn ingest_array(
        &self,
        obj: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> Result<Schema, CompatError> {
        match obj.get("items") {
            None => Ok(Schema::array(Schema::Unknown)),
            Some(Value::Array(items)) => {
                let mut tuple = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    if item.is_boolean() {
                        continue;
                    }
                    let item_path = build_path(path, &["items", &i.to_string()]);
                    tuple.push(self.ingest(item, &item_path, depth + 1)?);
                }
                Ok(Schema::Tuple(tuple))
            }
            Some(items) => {
                let items = self.ingest(items, &build_path(path, &["items"]), depth + 1)?;
                Ok(Schema::array(items))
            }
        }
    }

    /// An object with both `properties` and `additionalProperties` is the
    /// intersection of its fixed-key form and its map form.
    fn ingest_object(
        &self,
        obj: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> Result<Schema, CompatError> {
        match (obj.get("properties"), obj.get("additionalProperties")) {
            (Some(properties), Some(additional)) => Ok(Schema::Intersection(vec![
                self.ingest_properties(properties, obj.get("required"), path, depth)?,
                self.ingest_additional(additional, path, depth)?,
            ])),
            (Some(properties), None) => {
                self.ingest_properties(properties, obj.get("required"), path, depth)
            }
            (None, Some(additional)) => self.ingest_additional(additional, path, depth),
            (None, None) => Ok(Schema::Object(Default::default())),
        }
    }

    fn ingest_properties(
        &self,
        properties: &Value,
        required: Option<&Value>,
        path: &str,
        depth: usize,
    ) -> Result<Schema, CompatError> {
        let Value::Object(properties) = properties else {
            return Err(CompatError::InvalidSchema {
                path: build_path(path, &["properties"]),
                message: format!("properties must be an object, found {}", properties),
            });
        };
        let required = required_keys(required, path)?;

        let mut ingested = super::Properties::new();
        for (key, value) in properties {
            let property_path = build_path(path, &["properties", key]);
            let schema = self.ingest(value, &property_path, depth + 1)?;
            let schema = if required.contains(&key.as_str()) {
                schema
            } else {
                Schema::optional(schema)
            };
            ingested.insert(key.clone(), schema);
        }
        Ok(Schema::Object(ingested))
    }

    fn ingest_additional(
        &self,
        additional: &Value,
        path: &str,
        depth: usize,
    ) -> Result<Schema, CompatError> {
        match additional {
            Value::Bool(true) => Ok(Schema::map(Schema::Unknown)),
            Value::Bool(false) => Ok(Schema::Object(Default::default())),
            Value::Object(_) => {
                let additional_path = build_path(path, &["additionalProperties"]);
                let items = self.ingest(additional, &additional_path, depth + 1)?;
                Ok(Schema::map(items))
            }
            other => Err(CompatError::InvalidSchema {
                path: build_path(path, &["additionalProperties"]),
                message: format!(
                    "additionalProperties must be a boolean or a schema, found {}",
                    other
                ),
            }),
        }
    }

    fn ingest_untyped(
        &self,
        obj: &Map<String, Value>,
        path: &str,
        depth: usize,
    ) -> Result<Schema, CompatError> {
        if let Some(any_of) = obj.get("anyOf") {
            let members = self.ingest_members(any_of, "anyOf", path, depth)?;
            return Ok(Schema::Union(members));
        }
        if let Some(all_of) = obj.get("allOf") {
            let members = self.ingest_members(all_of, "allOf", path, depth)?;
            return Ok(Schema::Intersection(members));
        }
        Ok(Schema::Unknown)
    }

    /// Members of `anyOf` / `allOf`. A boolean member carries no structure and
    /// ingests to `Unknown`.
    fn ingest_members(
        &self,
        members: &Value,
        keyword: &str,
        path: &str,
        depth: usize,
    ) -> Result<Vec<Schema>, CompatError> {
        let Value::Array(members) = members else {
            return Err(CompatError::InvalidSchema {
                path: build_path(path, &[keyword]),
                message: format!("{} must be an array, found {}", keyword, members),
            });
        };

        let mut ingested = Vec::with_capacity(members.len());
        for (i, member) in members.iter().enumerate() {
            if member.is_boolean() {
                ingested.push(Schema::Unknown);
                continue;
            }
            let member_path = build_path(path, &[keyword, &i.to_string()]);
            ingested.push(self.ingest(member, &member_path, depth + 1)?);
        }
        Ok(ingested)
    }
}

/// Wildcard primitive, or the literal(s) of `enum`/`const` matching its kind.
fn primitive<F>(
    obj: &Map<String, Value>,
    path: &str,
    wildcard: Schema,
    as_literal: F,
) -> Result<Schema, CompatError>
where
    F: Fn(&Value) -> Option<Schema>,
{
    let mut values: Vec<&Value> = Vec::new();
    if let Some(enum_values) = obj.get("enum") {
        let Value::Array(enum_values) = enum_values else {
            return Err(CompatError::InvalidSchema {
                path: build_path(path, &["enum"]),
                message: format!("enum must be an array, found {}", enum_values),
            });
        };
        values.extend(enum_values);
    }
    if let Some(const_value) = obj.get("const") {
        values.push(const_value);
    }

    let mut literals: Vec<Schema> = values.into_iter().filter_map(as_literal).collect();
    Ok(match literals.len() {
        0 => wildcard,
        1 => literals.remove(0),
        _ => Schema::Union(literals),
    })
}

fn required_keys<'a>(required: Option<&'a Value>, path: &str) -> Result<Vec<&'a str>, CompatError> {
    let Some(required) = required else {
        return Ok(Vec::new());
    };
    let Value::Array(keys) = required else {
        return Err(CompatError::InvalidSchema {
            path: build_path(path, &["required"]),
            message: format!("required must be an array, found {}", required),
        });
    };

    keys.iter()
        .enumerate()
        .map(|(i, key)| {
            key.as_str().ok_or_else(|| CompatError::InvalidSchema {
                path: build_path(path, &["required", &i.to_string()]),
                message: format!("required entries must be strings, found {}", key),
            })
        })
        .collect()
}
