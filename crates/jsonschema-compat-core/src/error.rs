//! Error types for dereferencing, ingestion and merging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// Serialized as `snake_case` strings; the CLI prints them in its JSON error
/// output, so variant names must not change across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// JSON (de)serialization error.
    JsonParseError,
    /// A `$ref` target could not be found, or references form a cycle.
    ReferenceError,
    /// The schema document is structurally malformed.
    ParserError,
    /// A schema node could not be translated into the IR.
    InvalidSchema,
    /// The schema uses a keyword this crate refuses to approximate.
    UnsupportedFeature,
    /// Schema nesting exceeded the configured depth limit.
    RecursionDepthExceeded,
    /// A merge operand did not normalize to an object schema.
    NonObjectMerge,
}

#[derive(Debug, Error)]
pub enum CompatError {
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unresolvable $ref at {path}: {reference}")]
    UnresolvableRef { path: String, reference: String },

    #[error("Circular $ref at {path}: {reference}")]
    CircularRef { path: String, reference: String },

    #[error("Malformed schema at {path}: {message}")]
    MalformedSchema { path: String, message: String },

    #[error("Invalid schema at {path}: {message}")]
    InvalidSchema { path: String, message: String },

    #[error("Unsupported schema feature at {path}: {feature}")]
    UnsupportedFeature { path: String, feature: String },

    #[error("Recursion depth exceeded at {path} (max: {max_depth})")]
    RecursionDepthExceeded { path: String, max_depth: usize },

    #[error("Cannot merge {operand} schema: expected an object, found {found}")]
    NonObjectMerge { operand: String, found: String },
}

impl CompatError {
    /// Returns the stable error code for this error variant.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CompatError::JsonError(_) => ErrorCode::JsonParseError,
            CompatError::UnresolvableRef { .. } | CompatError::CircularRef { .. } => {
                ErrorCode::ReferenceError
            }
            CompatError::MalformedSchema { .. } => ErrorCode::ParserError,
            CompatError::InvalidSchema { .. } => ErrorCode::InvalidSchema,
            CompatError::UnsupportedFeature { .. } => ErrorCode::UnsupportedFeature,
            CompatError::RecursionDepthExceeded { .. } => ErrorCode::RecursionDepthExceeded,
            CompatError::NonObjectMerge { .. } => ErrorCode::NonObjectMerge,
        }
    }

    /// Returns the JSON Pointer of the offending schema node, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            CompatError::JsonError(_) => None,
            CompatError::UnresolvableRef { path, .. } => Some(path),
            CompatError::CircularRef { path, .. } => Some(path),
            CompatError::MalformedSchema { path, .. } => Some(path),
            CompatError::InvalidSchema { path, .. } => Some(path),
            CompatError::UnsupportedFeature { path, .. } => Some(path),
            CompatError::RecursionDepthExceeded { path, .. } => Some(path),
            CompatError::NonObjectMerge { .. } => None,
        }
    }

    /// Whether this error came out of `$ref` resolution.
    pub fn is_reference_error(&self) -> bool {
        self.error_code() == ErrorCode::ReferenceError
    }

    /// Structured form: `{"code": "...", "message": "...", "path": "..." | null}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "path": self.path(),
        })
    }
}
