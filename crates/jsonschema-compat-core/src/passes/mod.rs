//! Normalization pass modules.
//!
//! Each pass is a structure-preserving rewrite of the IR. Passes run in order
//! (0-2) and the judgments assume at least pass 0 has run.

pub mod p0_flatten_unions;
pub mod p1_flatten_intersections;
pub mod p2_apply_intersections;
pub mod traverse;

pub use p0_flatten_unions::flatten_unions;
pub use p1_flatten_intersections::flatten_intersections;
pub use p2_apply_intersections::apply_intersections;
pub use traverse::{traverse_post_order, traverse_pre_order};

use crate::config::NormalizationMode;
use crate::ir::Schema;

/// Run the normalization pipeline selected by `mode`.
pub fn normalize(schema: Schema, mode: NormalizationMode) -> Schema {
    tracing::trace!(pass = "p0_flatten_unions", "running");
    let schema = flatten_unions(schema);

    match mode {
        NormalizationMode::UnionsOnly => schema,
        NormalizationMode::Full => {
            tracing::trace!(pass = "p1_flatten_intersections", "running");
            let schema = flatten_intersections(schema);
            tracing::trace!(pass = "p2_apply_intersections", "running");
            apply_intersections(schema)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nested() -> Schema {
        Schema::intersection([
            Schema::intersection([Schema::object([("a", Schema::string())])]),
            Schema::object([(
                "b",
                Schema::union([Schema::union([Schema::Null]), Schema::number()]),
            )]),
        ])
    }

    #[test]
    fn test_unions_only_leaves_intersections() {
        assert_eq!(
            normalize(nested(), NormalizationMode::UnionsOnly),
            Schema::intersection([
                Schema::intersection([Schema::object([("a", Schema::string())])]),
                Schema::object([("b", Schema::union([Schema::Null, Schema::number()]))]),
            ])
        );
    }

    #[test]
    fn test_full_merges_intersected_objects() {
        assert_eq!(
            normalize(nested(), NormalizationMode::Full),
            Schema::object([
                ("a", Schema::string()),
                ("b", Schema::union([Schema::Null, Schema::number()])),
            ])
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for mode in [NormalizationMode::UnionsOnly, NormalizationMode::Full] {
            let once = normalize(nested(), mode);
            assert_eq!(normalize(once.clone(), mode), once, "{:?}", mode);
        }
    }
}
