//! Structural subtyping: does every value accepted by the child schema also
//! satisfy the parent schema?
//!
//! The judgment never short-circuits on the first mismatch. Every failing leaf
//! is reported with the data path where it occurs, so a caller sees all the
//! incompatibilities between two contract versions at once.

use std::fmt;

use crate::equals::equals;
use crate::ir::{Properties, Schema};
use crate::property_path::{PathSegment, PropertyPath};

/// One mismatch found by [`extends`]: at `path`, `child` is not assignable to
/// `parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureReason {
    pub path: PropertyPath,
    pub child: Schema,
    pub parent: Schema,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ⊈ {}", self.path, self.child, self.parent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtendsResult {
    Extends,
    DoesNotExtend(Vec<FailureReason>),
}

impl ExtendsResult {
    pub fn is_extends(&self) -> bool {
        matches!(self, ExtendsResult::Extends)
    }

    /// Failure reasons; empty when the child extends the parent.
    pub fn reasons(&self) -> &[FailureReason] {
        match self {
            ExtendsResult::Extends => &[],
            ExtendsResult::DoesNotExtend(reasons) => reasons,
        }
    }
}

/// Whether `child` extends `parent`. Both must be normalized.
pub fn extends(child: &Schema, parent: &Schema) -> ExtendsResult {
    match check(&PropertyPath::root(), child, parent) {
        Ok(()) => ExtendsResult::Extends,
        Err(reasons) => ExtendsResult::DoesNotExtend(reasons),
    }
}

type Judgment = Result<(), Vec<FailureReason>>;

fn check(path: &PropertyPath, child: &Schema, parent: &Schema) -> Judgment {
    // Unknown is the top type, whatever the child's shape.
    if matches!(parent, Schema::Unknown) {
        return Ok(());
    }

    // Composite nodes next: the parent's intersection, then the child's
    // intersection, then the child's union, then the parent's union.
    if let Schema::Intersection(members) = parent {
        return all(members.iter().map(|p| check(path, child, p)));
    }
    if let Schema::Intersection(members) = child {
        let judgments = members.iter().map(|c| check(path, c, parent));
        // The intersection as a whole may match one alternative of a union.
        if let Schema::Union(alternatives) = parent {
            let whole = alternatives.iter().map(|p| check(path, child, p));
            return any(judgments.chain(whole), path, child, parent);
        }
        return any(judgments, path, child, parent);
    }
    if let Schema::Union(members) = child {
        return all(members.iter().map(|c| check(path, c, parent)));
    }
    if let Schema::Union(members) = parent {
        return any(members.iter().map(|p| check(path, child, p)), path, child, parent);
    }

    match (child, parent) {
        (Schema::Unknown, _) => fail(path, child, parent),

        (Schema::Object(properties), Schema::Map(items)) => all(
            properties
                .iter()
                .map(|(key, value)| check(&path.key(key), value, items)),
        ),
        (Schema::Object(child_properties), Schema::Object(parent_properties)) => {
            object_extends_object(path, child_properties, parent_properties)
        }
        (Schema::Map(items), Schema::Object(properties)) => {
            // Any given key may be missing from a map.
            let value = Schema::optional((**items).clone());
            all(properties
                .iter()
                .map(|(key, parent_value)| check(&path.key(key), &value, parent_value)))
        }
        (Schema::Map(child_items), Schema::Map(parent_items)) => check(
            &path.join(PathSegment::StringIndex(None)),
            child_items,
            parent_items,
        ),

        (Schema::Tuple(items), Schema::Array(parent_items)) => all(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| check(&path.index(i), item, parent_items)),
        ),
        // Positions past the end of the parent are unconstrained. A child
        // shorter than the parent is not checked against the parent's extra
        // positions.
        (Schema::Tuple(child_items), Schema::Tuple(parent_items)) => all(
            child_items
                .iter()
                .zip(parent_items)
                .enumerate()
                .map(|(i, (c, p))| check(&path.index(i), c, p)),
        ),
        (Schema::Array(child_items), Schema::Array(parent_items)) => check(
            &path.join(PathSegment::NumberIndex(None)),
            child_items,
            parent_items,
        ),

        (Schema::String(c), Schema::String(p)) => literal_extends(path, child, parent, c, p),
        (Schema::Number(c), Schema::Number(p)) => literal_extends(path, child, parent, c, p),
        (Schema::Boolean(c), Schema::Boolean(p)) => literal_extends(path, child, parent, c, p),

        _ if equals(child, parent) => Ok(()),
        _ => fail(path, child, parent),
    }
}

/// Width subtyping: every parent key must be satisfied, extra child keys are
/// ignored. A key missing from the child is `Undefined`.
fn object_extends_object(
    path: &PropertyPath,
    child: &Properties,
    parent: &Properties,
) -> Judgment {
    let undefined = Schema::Undefined;
    all(parent.iter().map(|(key, parent_value)| {
        let child_value = child.get(key).unwrap_or(&undefined);
        check(&path.key(key), child_value, parent_value)
    }))
}

/// A wildcard parent accepts any child of its kind; a literal parent only the
/// same literal.
fn literal_extends<T: PartialEq>(
    path: &PropertyPath,
    child: &Schema,
    parent: &Schema,
    child_value: &Option<T>,
    parent_value: &Option<T>,
) -> Judgment {
    match parent_value {
        None => Ok(()),
        Some(expected) if child_value.as_ref() == Some(expected) => Ok(()),
        Some(_) => fail(path, child, parent),
    }
}

fn fail(path: &PropertyPath, child: &Schema, parent: &Schema) -> Judgment {
    Err(vec![FailureReason {
        path: path.clone(),
        child: child.clone(),
        parent: parent.clone(),
    }])
}

/// Succeeds when every judgment succeeds; otherwise reports all failures.
fn all(judgments: impl Iterator<Item = Judgment>) -> Judgment {
    let mut reasons = Vec::new();
    for judgment in judgments {
        if let Err(failed) = judgment {
            reasons.extend(failed);
        }
    }
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(reasons)
    }
}

/// Succeeds when at least one judgment succeeds. An empty alternative set
/// fails at `path` itself so that the failure is never reported without a
/// reason.
fn any(
    judgments: impl Iterator<Item = Judgment>,
    path: &PropertyPath,
    child: &Schema,
    parent: &Schema,
) -> Judgment {
    let mut reasons = Vec::new();
    for judgment in judgments {
        match judgment {
            Ok(()) => return Ok(()),
            Err(failed) => reasons.extend(failed),
        }
    }
    if reasons.is_empty() {
        fail(path, child, parent)
    } else {
        Err(reasons)
    }
}
