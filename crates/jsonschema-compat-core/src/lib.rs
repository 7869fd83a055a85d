//! # jsonschema-compat-core
//!
//! Structural equality, subtyping and merge for JSON Schema data contracts.
//!
//! Every entry point runs the same pipeline: resolve `$ref`s, translate each
//! schema into the [`Schema`] IR, normalize it, then judge. The `*_resolved`
//! variants skip the first step for callers whose schemas are already
//! reference-free.
//!
//! ```
//! use jsonschema_compat_core::{schema_extends, CompareOptions};
//! use serde_json::json;
//!
//! let v1 = json!({
//!     "type": "object",
//!     "properties": { "id": { "type": "string" } },
//!     "required": ["id"]
//! });
//! let v2 = json!({
//!     "type": "object",
//!     "properties": {
//!         "id": { "type": "string" },
//!         "note": { "type": "string" }
//!     },
//!     "required": ["id"]
//! });
//!
//! let report = schema_extends(&v2, &v1, &CompareOptions::default()).unwrap();
//! assert!(report.extends);
//!
//! let report = schema_extends(&v1, &json!({ "type": "string" }), &CompareOptions::default()).unwrap();
//! assert!(!report.extends);
//! assert_eq!(report.reasons, vec!["#: { id: string } ⊈ string"]);
//! ```

pub mod config;
pub mod deref;
pub mod equals;
pub mod error;
pub mod extends;
pub mod ir;
pub mod merge;
pub mod passes;
pub mod property_path;
pub mod schema_utils;
pub mod set;

pub use config::{CompareOptions, NormalizationMode};
pub use deref::{dereference, Dereferencer};
pub use equals::equals;
pub use error::{CompatError, ErrorCode};
pub use extends::{extends, ExtendsResult, FailureReason};
pub use ir::Schema;
pub use merge::merge_objects;
pub use property_path::{PathSegment, PropertyPath};
pub use schema_utils::{build_path, split_path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Serializable outcome of [`schema_extends`].
///
/// Serializes as `{"extends":true}` or `{"extends":false,"reasons":[...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendsReport {
    pub extends: bool,
    /// One line per failing location, `<path>: <child> ⊈ <parent>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl From<ExtendsResult> for ExtendsReport {
    fn from(result: ExtendsResult) -> Self {
        match result {
            ExtendsResult::Extends => ExtendsReport {
                extends: true,
                reasons: Vec::new(),
            },
            ExtendsResult::DoesNotExtend(reasons) => ExtendsReport {
                extends: false,
                reasons: reasons.iter().map(ToString::to_string).collect(),
            },
        }
    }
}

/// Whether `a` and `b` describe the same values.
pub fn schema_equals(a: &Value, b: &Value, options: &CompareOptions) -> Result<bool, CompatError> {
    tracing::debug!(normalization = ?options.normalization, "schema_equals");
    let a = dereference(a, options)?;
    let b = dereference(b, options)?;
    schema_equals_resolved(&a, &b, options)
}

/// [`schema_equals`] for schemas without `$ref`.
pub fn schema_equals_resolved(
    a: &Value,
    b: &Value,
    options: &CompareOptions,
) -> Result<bool, CompatError> {
    let a = prepare(a, options)?;
    let b = prepare(b, options)?;
    Ok(equals(&a, &b))
}

/// Whether every value valid under `child` is valid under `parent`.
///
/// Incompatibility is a result, not an error: the report lists every failing
/// location. Errors are reserved for schemas that cannot be read.
pub fn schema_extends(
    child: &Value,
    parent: &Value,
    options: &CompareOptions,
) -> Result<ExtendsReport, CompatError> {
    tracing::debug!(normalization = ?options.normalization, "schema_extends");
    let child = dereference(child, options)?;
    let parent = dereference(parent, options)?;
    schema_extends_resolved(&child, &parent, options)
}

/// [`schema_extends`] for schemas without `$ref`.
pub fn schema_extends_resolved(
    child: &Value,
    parent: &Value,
    options: &CompareOptions,
) -> Result<ExtendsReport, CompatError> {
    let child = prepare(child, options)?;
    let parent = prepare(parent, options)?;
    let result = extends(&child, &parent);
    tracing::debug!(
        extends = result.is_extends(),
        reasons = result.reasons().len(),
        "subtyping judged"
    );
    Ok(result.into())
}

/// Shallow merge of two object schemas; properties of `b` replace those of
/// `a`. Both inputs must normalize to a plain object.
pub fn schema_merge(a: &Value, b: &Value, options: &CompareOptions) -> Result<Value, CompatError> {
    tracing::debug!(normalization = ?options.normalization, "schema_merge");
    let a = dereference(a, options)?;
    let b = dereference(b, options)?;
    schema_merge_resolved(&a, &b, options)
}

/// [`schema_merge`] for schemas without `$ref`.
pub fn schema_merge_resolved(
    a: &Value,
    b: &Value,
    options: &CompareOptions,
) -> Result<Value, CompatError> {
    let a = prepare(a, options)?;
    let b = prepare(b, options)?;
    match (a, b) {
        (Schema::Object(a), Schema::Object(b)) => {
            Ok(ir::to_json_schema(&Schema::Object(merge_objects(&a, &b))))
        }
        (Schema::Object(_), other) => Err(non_object("right", &other)),
        (other, _) => Err(non_object("left", &other)),
    }
}

fn prepare(schema: &Value, options: &CompareOptions) -> Result<Schema, CompatError> {
    let ingested = ir::from_json_schema(schema, options)?;
    Ok(passes::normalize(ingested, options.normalization))
}

fn non_object(operand: &str, found: &Schema) -> CompatError {
    CompatError::NonObjectMerge {
        operand: operand.to_string(),
        found: found.kind().to_string(),
    }
}
