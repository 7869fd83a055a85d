//! `$ref` dereferencing.
//!
//! Inlines every `$ref` of a schema document so that ingestion only ever sees
//! self-contained schemas. Resolution is purely in-memory: local pointers
//! (`#`, `#/…`) resolve against the document they appear in, and
//! `uri#/…` pointers resolve against documents the caller registered with
//! [`Dereferencer::with_document`].
//!
//! Circular references are not supported. Reaching a reference that is already
//! being resolved fails with [`CompatError::CircularRef`] instead of looping.
//!
//! Failures map onto the error taxonomy as follows:
//! - missing pointer target or unknown document → `UnresolvableRef`
//! - reference cycle → `CircularRef`
//! - non-string `$ref`, non-pointer fragment, non-schema root → `MalformedSchema`

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::config::CompareOptions;
use crate::error::CompatError;
use crate::schema_utils::{build_path, is_pointer_fragment, recurse_into_children, resolve_pointer};

/// Sibling keywords of `$ref` that override the target's value instead of
/// adding a constraint.
const ANNOTATION_KEYWORDS: &[&str] = &[
    "description",
    "title",
    "$comment",
    "examples",
    "default",
    "deprecated",
    "readOnly",
    "writeOnly",
];

/// Sibling keywords of `$ref` that carry no constraint on the value.
const DOCUMENT_KEYWORDS: &[&str] = &["$ref", "$defs", "definitions", "$schema", "$id"];

/// Resolves `$ref` pointers against the root document and any registered
/// external documents.
#[derive(Debug, Clone)]
pub struct Dereferencer {
    max_depth: usize,
    documents: HashMap<String, Value>,
}

/// The document a node belongs to; local refs resolve against it.
#[derive(Clone, Copy)]
struct DocRef<'a> {
    uri: &'a str,
    root: &'a Value,
}

struct RefContext {
    /// `uri#fragment` keys of the refs on the current resolution stack.
    visiting: HashSet<String>,
}

impl Dereferencer {
    pub fn new(options: &CompareOptions) -> Self {
        Self {
            max_depth: options.max_depth,
            documents: HashMap::new(),
        }
    }

    /// Register an already-loaded document under the URI used in `$ref`s
    /// (the part before `#`, e.g. `common.json` in `common.json#/$defs/Id`).
    pub fn with_document(mut self, uri: impl Into<String>, document: Value) -> Self {
        self.documents.insert(uri.into(), document);
        self
    }

    /// Return a copy of `schema` with every `$ref` inlined.
    pub fn dereference(&self, schema: &Value) -> Result<Value, CompatError> {
        if !(schema.is_object() || schema.is_boolean()) {
            return Err(CompatError::MalformedSchema {
                path: "#".to_string(),
                message: format!("root schema must be an object or a boolean, found {}", schema),
            });
        }

        let mut ctx = RefContext {
            visiting: HashSet::new(),
        };
        let root = DocRef {
            uri: "",
            root: schema,
        };
        self.resolve_node(schema, "#", 0, root, &mut ctx)
    }

    fn resolve_node<'a>(
        &'a self,
        node: &Value,
        path: &str,
        depth: usize,
        doc: DocRef<'a>,
        ctx: &mut RefContext,
    ) -> Result<Value, CompatError> {
        if depth > self.max_depth {
            return Err(CompatError::RecursionDepthExceeded {
                path: path.to_string(),
                max_depth: self.max_depth,
            });
        }

        let Some(obj) = node.as_object() else {
            return Ok(node.clone());
        };

        if let Some(ref_val) = obj.get("$ref") {
            let Some(ref_str) = ref_val.as_str() else {
                return Err(CompatError::MalformedSchema {
                    path: build_path(path, &["$ref"]),
                    message: format!("$ref must be a string, found {}", ref_val),
                });
            };
            return self.resolve_ref(obj, ref_str, path, depth, doc, ctx);
        }

        let mut result = obj.clone();
        recurse_into_children(&mut result, path, depth, &mut |child: &Value,
                                                             child_path: &str,
                                                             child_depth: usize| {
            self.resolve_node(child, child_path, child_depth, doc, ctx)
        })?;
        Ok(Value::Object(result))
    }

    fn resolve_ref<'a>(
        &'a self,
        obj: &Map<String, Value>,
        ref_str: &str,
        path: &str,
        depth: usize,
        doc: DocRef<'a>,
        ctx: &mut RefContext,
    ) -> Result<Value, CompatError> {
        let (uri, fragment) = ref_str.split_once('#').unwrap_or((ref_str, ""));
        if !is_pointer_fragment(fragment) {
            return Err(CompatError::MalformedSchema {
                path: path.to_string(),
                message: format!("$ref fragment is not a JSON pointer: {}", ref_str),
            });
        }

        let target_doc = if uri.is_empty() {
            doc
        } else {
            let (uri, root) = self.documents.get_key_value(uri).ok_or_else(|| {
                CompatError::UnresolvableRef {
                    path: path.to_string(),
                    reference: ref_str.to_string(),
                }
            })?;
            DocRef {
                uri: uri.as_str(),
                root,
            }
        };

        let key = format!("{}#{}", target_doc.uri, fragment);
        if ctx.visiting.contains(&key) {
            return Err(CompatError::CircularRef {
                path: path.to_string(),
                reference: ref_str.to_string(),
            });
        }

        let target = resolve_pointer(target_doc.root, fragment).ok_or_else(|| {
            CompatError::UnresolvableRef {
                path: path.to_string(),
                reference: ref_str.to_string(),
            }
        })?;
        if !(target.is_object() || target.is_boolean()) {
            return Err(CompatError::MalformedSchema {
                path: build_path(path, &["$ref"]),
                message: format!("$ref {} points at a non-schema value {}", ref_str, target),
            });
        }

        tracing::debug!(path, reference = ref_str, "resolving $ref");

        ctx.visiting.insert(key.clone());
        let resolved = self.resolve_node(target, path, depth + 1, target_doc, ctx);
        ctx.visiting.remove(&key);
        let resolved = resolved?;

        let mut annotations = Map::new();
        let mut structural = Map::new();
        for (k, v) in obj
            .iter()
            .filter(|(k, _)| !DOCUMENT_KEYWORDS.contains(&k.as_str()))
        {
            if ANNOTATION_KEYWORDS.contains(&k.as_str()) {
                annotations.insert(k.clone(), v.clone());
            } else {
                structural.insert(k.clone(), v.clone());
            }
        }

        if annotations.is_empty() && structural.is_empty() {
            return Ok(resolved);
        }

        let mut merged = match resolved {
            Value::Object(m) => m,
            Value::Bool(false) => Map::from_iter([("not".to_string(), Value::Object(Map::new()))]),
            // Only `true` is left once the target is known to be a schema.
            _ => Map::new(),
        };
        merged.extend(annotations);

        if structural.is_empty() {
            return Ok(Value::Object(merged));
        }

        // Structural siblings still constrain the value; resolve them too.
        let siblings = self.resolve_node(&Value::Object(structural), path, depth + 1, doc, ctx)?;
        Ok(Value::Object(Map::from_iter([(
            "allOf".to_string(),
            Value::Array(vec![Value::Object(merged), siblings]),
        )])))
    }
}

/// Dereference `schema` with no external documents.
pub fn dereference(schema: &Value, options: &CompareOptions) -> Result<Value, CompatError> {
    Dereferencer::new(options).dereference(schema)
}
