//! Compact TypeScript-like rendering of the IR, used in failure reasons and by
//! `jsonschema-compat inspect`.

use std::fmt;

use serde_json::Value;

use super::Schema;

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::String(None) => f.write_str("string"),
            Schema::String(Some(value)) => write!(f, "{}", Value::from(value.as_str())),
            Schema::Number(None) => f.write_str("number"),
            Schema::Number(Some(value)) => write!(f, "{}", value),
            Schema::Boolean(None) => f.write_str("boolean"),
            Schema::Boolean(Some(value)) => write!(f, "{}", value),
            Schema::Null => f.write_str("null"),
            Schema::Undefined => f.write_str("undefined"),
            Schema::Unknown => f.write_str("unknown"),
            // No alternative admits no value; no constraint admits any.
            Schema::Union(members) if members.is_empty() => f.write_str("never"),
            Schema::Intersection(members) if members.is_empty() => f.write_str("unknown"),
            Schema::Union(members) => write_joined(f, members, " | "),
            Schema::Intersection(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    write_grouped(f, member)?;
                }
                Ok(())
            }
            Schema::Array(items) => {
                write_grouped(f, items)?;
                f.write_str("[]")
            }
            Schema::Tuple(items) => {
                f.write_str("[")?;
                write_joined(f, items, ", ")?;
                f.write_str("]")
            }
            Schema::Map(items) => write!(f, "{{ [key: string]: {} }}", items),
            Schema::Object(properties) if properties.is_empty() => f.write_str("{}"),
            Schema::Object(properties) => {
                f.write_str("{ ")?;
                for (i, (key, value)) in properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str(" }")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, members: &[Schema], separator: &str) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", member)?;
    }
    Ok(())
}

/// Parenthesize unions where `|` would bind looser than the context.
fn write_grouped(f: &mut fmt::Formatter<'_>, schema: &Schema) -> fmt::Result {
    match schema {
        Schema::Union(members) if !members.is_empty() => write!(f, "({})", schema),
        _ => write!(f, "{}", schema),
    }
}
