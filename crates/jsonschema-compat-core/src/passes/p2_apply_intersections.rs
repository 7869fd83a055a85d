//! Pass 2: Intersection Application
//!
//! `{ a: A } & { b: B } & { c: C }` and `{ a: A, b: B, c: C }` describe the same
//! values. This pass folds the object members of every intersection into one
//! object so the judgments see the second form.
//!
//! A key present in several objects becomes the intersection of its values.
//! Those new intersections are visited by the same pre-order traversal, so
//! nested objects are merged as well.

use super::traverse::traverse_pre_order;
use crate::ir::{Properties, Schema};

/// Merge the object members of every intersection.
///
/// With no non-object members the intersection collapses into the merged
/// object; otherwise it becomes `Intersection([...non_objects, merged])`.
pub fn apply_intersections(schema: Schema) -> Schema {
    traverse_pre_order(schema, &mut |node| match node {
        Schema::Intersection(members) => apply(members),
        other => other,
    })
}

fn apply(members: Vec<Schema>) -> Schema {
    let mut objects = Vec::new();
    let mut others = Vec::new();
    for member in members {
        match member {
            Schema::Object(properties) => objects.push(properties),
            other => others.push(other),
        }
    }

    if objects.is_empty() {
        return Schema::Intersection(others);
    }

    let merged = Schema::Object(objects.into_iter().fold(Properties::new(), merge_pair));
    if others.is_empty() {
        return merged;
    }
    others.push(merged);
    Schema::Intersection(others)
}

fn merge_pair(mut merged: Properties, next: Properties) -> Properties {
    for (key, value) in next {
        let combined = match merged.remove(&key) {
            Some(existing) => intersect(existing, value),
            None => value,
        };
        merged.insert(key, combined);
    }
    merged
}

/// `a & b`, splicing either side that is already an intersection.
fn intersect(a: Schema, b: Schema) -> Schema {
    let mut members = Vec::new();
    for side in [a, b] {
        match side {
            Schema::Intersection(inner) => members.extend(inner),
            other => members.push(other),
        }
    }
    Schema::Intersection(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_disjoint_objects_become_one_object() {
        let schema = Schema::intersection([
            Schema::object([("a", Schema::string())]),
            Schema::object([("b", Schema::number())]),
            Schema::object([("c", Schema::boolean())]),
        ]);
        assert_eq!(
            apply_intersections(schema),
            Schema::object([
                ("a", Schema::string()),
                ("b", Schema::number()),
                ("c", Schema::boolean()),
            ])
        );
    }

    #[test]
    fn test_non_object_members_stay_in_front_of_merged_object() {
        let schema = Schema::intersection([
            Schema::object([("a", Schema::string())]),
            Schema::object([("b", Schema::number())]),
            Schema::map(Schema::boolean()),
        ]);
        assert_eq!(
            apply_intersections(schema),
            Schema::intersection([
                Schema::map(Schema::boolean()),
                Schema::object([("a", Schema::string()), ("b", Schema::number())]),
            ])
        );
    }

    #[test]
    fn test_shared_keys_are_merged_deeply() {
        let schema = Schema::intersection([
            Schema::object([
                ("a", Schema::string()),
                ("c", Schema::object([("d", Schema::Undefined)])),
            ]),
            Schema::object([
                ("b", Schema::number()),
                ("c", Schema::object([("e", Schema::Null)])),
            ]),
        ]);
        assert_eq!(
            apply_intersections(schema),
            Schema::object([
                ("a", Schema::string()),
                ("b", Schema::number()),
                (
                    "c",
                    Schema::object([("d", Schema::Undefined), ("e", Schema::Null)])
                ),
            ])
        );
    }

    #[test]
    fn test_shared_key_splices_existing_intersection() {
        let banana = Schema::tuple([Schema::literal("banana")]);
        let schema = Schema::intersection([
            Schema::object([("c", Schema::object([("d", Schema::Undefined)]))]),
            Schema::object([(
                "c",
                Schema::intersection([Schema::object([("e", Schema::Null)]), banana.clone()]),
            )]),
            Schema::map(Schema::boolean()),
        ]);
        assert_eq!(
            apply_intersections(schema),
            Schema::intersection([
                Schema::map(Schema::boolean()),
                Schema::object([(
                    "c",
                    Schema::intersection([
                        banana,
                        Schema::object([("d", Schema::Undefined), ("e", Schema::Null)]),
                    ])
                )]),
            ])
        );
    }

    #[test]
    fn test_intersection_without_objects_is_unchanged() {
        let schema = Schema::intersection([Schema::string(), Schema::map(Schema::Null)]);
        assert_eq!(apply_intersections(schema.clone()), schema);
    }

    #[test]
    fn test_apply_intersections_is_idempotent() {
        let schema = Schema::array(Schema::intersection([
            Schema::object([("a", Schema::string())]),
            Schema::object([("a", Schema::literal("x")), ("b", Schema::Null)]),
            Schema::map(Schema::Unknown),
        ]));
        let once = apply_intersections(schema);
        assert_eq!(apply_intersections(once.clone()), once);
    }
}
