//! Schema intermediate representation.
//!
//! [`Schema`] is simpler than JSON Schema and easier to reason about: every
//! judgment in this crate is a `match` over its variants. Optionality is not a
//! flag; an optional property's value is `Union([T, Undefined])`.

mod emit;
mod format;
mod ingest;

use std::collections::BTreeMap;

pub use emit::to_json_schema;
pub use ingest::from_json_schema;

/// Object properties, keyed by name.
pub type Properties = BTreeMap<String, Schema>;

/// A JSON Schema in intermediate representation.
///
/// Primitive variants carry `None` for the wildcard (any value of that kind)
/// and `Some(v)` for a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String(Option<String>),
    /// Includes JSON Schema `integer`.
    Number(Option<f64>),
    Boolean(Option<bool>),
    Null,
    /// An absent value.
    Undefined,
    /// The top type; every schema extends it.
    Unknown,
    Union(Vec<Schema>),
    Intersection(Vec<Schema>),
    Object(Properties),
    /// Homogeneous array of unbounded length.
    Array(Box<Schema>),
    /// Fixed-arity positional array.
    Tuple(Vec<Schema>),
    /// Object with arbitrary string keys and uniform values.
    Map(Box<Schema>),
}

/// A primitive literal value, used to build literal schemas.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Number(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Number(f64::from(value))
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<Literal> for Schema {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::String(v) => Schema::String(Some(v)),
            Literal::Number(v) => Schema::Number(Some(v)),
            Literal::Boolean(v) => Schema::Boolean(Some(v)),
        }
    }
}

impl Schema {
    pub fn string() -> Self {
        Schema::String(None)
    }

    pub fn number() -> Self {
        Schema::Number(None)
    }

    pub fn boolean() -> Self {
        Schema::Boolean(None)
    }

    pub fn literal(value: impl Into<Literal>) -> Self {
        value.into().into()
    }

    pub fn union(members: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Union(members.into_iter().collect())
    }

    pub fn intersection(members: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Intersection(members.into_iter().collect())
    }

    /// `Union([inner, Undefined])`.
    pub fn optional(inner: Schema) -> Self {
        Schema::Union(vec![inner, Schema::Undefined])
    }

    pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, Schema)>) -> Self {
        Schema::Object(
            properties
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Tuple(items.into_iter().collect())
    }

    pub fn map(items: Schema) -> Self {
        Schema::Map(Box::new(items))
    }

    /// Whether the schema admits an absent value, i.e. is a union with an
    /// `Undefined` member.
    pub fn is_optional(&self) -> bool {
        match self {
            Schema::Union(members) => members.iter().any(|m| matches!(m, Schema::Undefined)),
            _ => false,
        }
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::String(_) => "string",
            Schema::Number(_) => "number",
            Schema::Boolean(_) => "boolean",
            Schema::Null => "null",
            Schema::Undefined => "undefined",
            Schema::Unknown => "unknown",
            Schema::Union(_) => "union",
            Schema::Intersection(_) => "intersection",
            Schema::Object(_) => "object",
            Schema::Array(_) => "array",
            Schema::Tuple(_) => "tuple",
            Schema::Map(_) => "map",
        }
    }
}
