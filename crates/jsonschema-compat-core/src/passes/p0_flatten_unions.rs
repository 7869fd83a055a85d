//! Pass 0: Union Flattening
//!
//! `A | (B | (C | D))` becomes `A | B | C | D`. Union is associative, so the
//! rewrite preserves meaning; the judgments rely on it to treat a union's
//! members as a flat set.

use super::traverse::traverse_post_order;
use crate::ir::Schema;

/// Splice every directly nested union into its parent union.
pub fn flatten_unions(schema: Schema) -> Schema {
    traverse_post_order(schema, &mut |node| match node {
        Schema::Union(members) => Schema::Union(splice(members)),
        other => other,
    })
}

// Post-order: nested members are already flat, one level is enough.
fn splice(members: Vec<Schema>) -> Vec<Schema> {
    let mut flat = Vec::with_capacity(members.len());
    for member in members {
        match member {
            Schema::Union(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    flat
}
