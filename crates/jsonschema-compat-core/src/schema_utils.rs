//! Shared JSON Schema document utilities.
//!
//! 1. **JSON Pointer handling** (RFC 6901) for error paths and `$ref` targets
//! 2. **Shared traversal** over every schema-bearing Draft-07 keyword, used by
//!    the dereferencer so that `$ref` is found wherever it may appear

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::error::CompatError;

// ---------------------------------------------------------------------------
// JSON Pointer (RFC 6901)
// ---------------------------------------------------------------------------

/// Escape a single path segment: `~` → `~0`, `/` → `~1`.
///
/// Returns `Cow::Borrowed` when no escaping is needed.
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Append escaped segments to a parent pointer.
///
/// # Example
/// ```
/// use jsonschema_compat_core::build_path;
/// assert_eq!(build_path("#", &["properties", "a/b"]), "#/properties/a~1b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}

/// Unescape a single path segment. `~1` is replaced before `~0`.
pub fn unescape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains("~0") || segment.contains("~1") {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Split a pointer (with or without the leading `#`) into decoded segments.
///
/// # Example
/// ```
/// use jsonschema_compat_core::split_path;
/// assert_eq!(split_path("#/properties/a~1b/items"), vec!["properties", "a/b", "items"]);
/// assert_eq!(split_path("#"), Vec::<String>::new());
/// ```
pub fn split_path(path: &str) -> Vec<String> {
    let stripped = path.strip_prefix('#').unwrap_or(path);
    if stripped.is_empty() {
        return Vec::new();
    }

    let mut segments = stripped.split('/');
    // "#/" is the empty-string key, so only the leading separator is skipped.
    if stripped.starts_with('/') {
        segments.next();
    }

    segments
        .map(|s| unescape_pointer_segment(s).into_owned())
        .collect()
}

/// Whether a `$ref` fragment (the part after `#`) is a valid JSON Pointer.
pub fn is_pointer_fragment(fragment: &str) -> bool {
    fragment.is_empty() || fragment.starts_with('/')
}

/// Look up a pointer fragment (`""`, `"/$defs/Address"`, …) in a document.
///
/// Returns `None` when any segment is missing or indexes a non-container.
pub fn resolve_pointer<'a>(root: &'a Value, fragment: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in split_path(fragment) {
        current = match current {
            Value::Object(obj) => obj.get(&segment)?,
            Value::Array(arr) => arr.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

// ---------------------------------------------------------------------------
// Shared schema traversal
// ---------------------------------------------------------------------------

/// Keywords whose value is a map from names to schemas.
const MAP_OF_SCHEMAS: &[&str] = &[
    "properties",
    "patternProperties",
    "definitions",
    "$defs",
    "dependencies",
];

/// Keywords whose value is a single schema.
const SINGLE_SCHEMA: &[&str] = &[
    "additionalProperties",
    "propertyNames",
    "additionalItems",
    "contains",
    "not",
    "if",
    "then",
    "else",
];

/// Keywords whose value is a list of schemas.
const ARRAY_OF_SCHEMAS: &[&str] = &["anyOf", "allOf", "oneOf"];

/// Rewrite every schema-bearing child of a schema object through `walk_fn`.
///
/// Non-schema values found under a keyword (`additionalProperties: false`,
/// `dependencies: {"a": ["b"]}`, `items: true`) are passed through untouched.
/// Children are extracted, walked, then reinserted to avoid borrow conflicts.
pub fn recurse_into_children<F>(
    obj: &mut Map<String, Value>,
    path: &str,
    depth: usize,
    walk_fn: &mut F,
) -> Result<(), CompatError>
where
    F: FnMut(&Value, &str, usize) -> Result<Value, CompatError>,
{
    for &keyword in MAP_OF_SCHEMAS {
        if let Some(Value::Object(map)) = obj.get(keyword) {
            let mut walked = Map::new();
            for (key, val) in map {
                let walked_val = if is_schema(val) {
                    walk_fn(val, &build_path(path, &[keyword, key]), depth + 1)?
                } else {
                    val.clone()
                };
                walked.insert(key.clone(), walked_val);
            }
            obj.insert(keyword.to_string(), Value::Object(walked));
        }
    }

    for &keyword in SINGLE_SCHEMA {
        if let Some(val) = obj.get(keyword).filter(|v| v.is_object()) {
            let walked = walk_fn(val, &build_path(path, &[keyword]), depth + 1)?;
            obj.insert(keyword.to_string(), walked);
        }
    }

    for &keyword in ARRAY_OF_SCHEMAS {
        if let Some(Value::Array(variants)) = obj.get(keyword) {
            let mut walked = Vec::with_capacity(variants.len());
            for (i, variant) in variants.iter().enumerate() {
                let child_path = build_path(path, &[keyword, &i.to_string()]);
                walked.push(walk_fn(variant, &child_path, depth + 1)?);
            }
            obj.insert(keyword.to_string(), Value::Array(walked));
        }
    }

    match obj.get("items") {
        Some(items @ Value::Object(_)) => {
            let walked = walk_fn(items, &build_path(path, &["items"]), depth + 1)?;
            obj.insert("items".to_string(), walked);
        }
        Some(Value::Array(arr)) => {
            let mut walked = Vec::with_capacity(arr.len());
            for (i, item) in arr.iter().enumerate() {
                let child_path = build_path(path, &["items", &i.to_string()]);
                walked.push(walk_fn(item, &child_path, depth + 1)?);
            }
            obj.insert("items".to_string(), Value::Array(walked));
        }
        _ => {}
    }

    Ok(())
}

fn is_schema(value: &Value) -> bool {
    value.is_object() || value.is_boolean()
}
