//! Configuration for schema comparison.

use serde::{Deserialize, Serialize};

/// Which normalization passes run before a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationMode {
    /// Flatten nested unions only. Intersections are left as ingested and the
    /// subtyping judgment distributes them itself.
    #[default]
    UnionsOnly,
    /// Flatten unions, flatten intersections, then fold intersected objects
    /// into a single object.
    Full,
}

/// Options shared by the dereferencer, ingestion and the public entry points.
///
/// Fields are serialized in `kebab-case` (`max-depth`, `normalization`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CompareOptions {
    /// Normalization pipeline. Default: unions only.
    pub normalization: NormalizationMode,
    /// Maximum schema nesting depth for `$ref` resolution and ingestion
    /// (stack overflow guard). Default: 50.
    pub max_depth: usize,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            normalization: NormalizationMode::UnionsOnly,
            max_depth: 50,
        }
    }
}
