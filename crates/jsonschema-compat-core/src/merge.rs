//! Shallow override merge of two object schemas.

use crate::ir::Properties;

/// Union of both key sets. On a shared key `b`'s value replaces `a`'s
/// outright; nested objects are not merged.
pub fn merge_objects(a: &Properties, b: &Properties) -> Properties {
    let mut merged = a.clone();
    for (key, value) in b {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
