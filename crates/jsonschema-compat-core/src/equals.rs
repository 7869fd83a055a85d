//! Structural equality of normalized schemas.
//!
//! Unions and intersections are compared as sets: member order and duplicate
//! members are irrelevant. Nested unions must already be flattened, otherwise
//! `a | (b | c)` and `a | b | c` compare unequal.

use crate::ir::Schema;
use crate::set::CompareSet;

/// Whether `a` and `b` describe the same values, structurally.
pub fn equals(a: &Schema, b: &Schema) -> bool {
    match (a, b) {
        (Schema::Array(a), Schema::Array(b)) | (Schema::Map(a), Schema::Map(b)) => equals(a, b),
        (Schema::Tuple(a), Schema::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| equals(a, b))
        }
        (Schema::Object(a), Schema::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| equals(a, b)))
        }
        (Schema::Union(a), Schema::Union(b))
        | (Schema::Intersection(a), Schema::Intersection(b)) => members_equal(a, b),
        // Primitives, literals and nullary kinds: same tag, same value.
        _ => a == b,
    }
}

fn same_schema(a: &&Schema, b: &&Schema) -> bool {
    equals(a, b)
}

fn members_equal(a: &[Schema], b: &[Schema]) -> bool {
    let a = CompareSet::from_items(a, same_schema);
    let b = CompareSet::from_items(b, same_schema);
    a.is_equal(&b)
}
