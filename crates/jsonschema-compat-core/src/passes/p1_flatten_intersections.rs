//! Pass 1: Intersection Flattening
//!
//! `A & (B & (C & D))` becomes `A & B & C & D`.

use super::traverse::traverse_post_order;
use crate::ir::Schema;

/// Splice every directly nested intersection into its parent intersection.
pub fn flatten_intersections(schema: Schema) -> Schema {
    traverse_post_order(schema, &mut |node| match node {
        Schema::Intersection(members) => {
            let mut flat = Vec::with_capacity(members.len());
            for member in members {
                match member {
                    Schema::Intersection(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            Schema::Intersection(flat)
        }
        other => other,
    })
}
