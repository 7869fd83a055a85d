//! Generic IR rewrites.
//!
//! Both traversals consume the tree and rebuild it; a visitor returns the
//! replacement for the node it is given.

use crate::ir::Schema;

/// Rewrite children first, then the node itself.
pub fn traverse_post_order<F>(schema: Schema, visit: &mut F) -> Schema
where
    F: FnMut(Schema) -> Schema,
{
    let schema = map_children(schema, &mut |child| traverse_post_order(child, visit));
    visit(schema)
}

/// Rewrite the node first, then descend into the children of the replacement.
///
/// Nodes introduced by the visitor are themselves visited.
pub fn traverse_pre_order<F>(schema: Schema, visit: &mut F) -> Schema
where
    F: FnMut(Schema) -> Schema,
{
    let schema = visit(schema);
    map_children(schema, &mut |child| traverse_pre_order(child, visit))
}

fn map_children<F>(schema: Schema, f: &mut F) -> Schema
where
    F: FnMut(Schema) -> Schema,
{
    match schema {
        Schema::Union(members) => Schema::Union(members.into_iter().map(&mut *f).collect()),
        Schema::Intersection(members) => {
            Schema::Intersection(members.into_iter().map(&mut *f).collect())
        }
        Schema::Object(properties) => Schema::Object(
            properties
                .into_iter()
                .map(|(key, value)| (key, f(value)))
                .collect(),
        ),
        Schema::Array(items) => Schema::Array(Box::new(f(*items))),
        Schema::Tuple(items) => Schema::Tuple(items.into_iter().map(&mut *f).collect()),
        Schema::Map(items) => Schema::Map(Box::new(f(*items))),
        leaf @ (Schema::String(_)
        | Schema::Number(_)
        | Schema::Boolean(_)
        | Schema::Null
        | Schema::Undefined
        | Schema::Unknown) => leaf,
    }
}
