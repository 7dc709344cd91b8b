//! Shared "operator-leaf" walk used by both the query compiler and (from
//! `bedquilt-engine`) the constraint compiler.
//!
//! Both mini-languages share the same document shape: walk a JSON object
//! recursively; at each key, a `$`-prefixed key is an operator applying to
//! the *current* path, while a non-`$` key descends one level deeper (its
//! value becomes the next object to walk, at the extended path). The two
//! languages differ only in which operator names are legal and how their
//! arguments are validated — that part is intentionally left to the caller.

use bedquilt_core::{DottedPath, JsonValue};
use serde_json::Map;

/// One operator-bearing leaf found during the walk: the dotted path it
/// applies to, and the `$`-prefixed `(name, argument)` pairs found there.
/// A single leaf can carry more than one operator (e.g. `{$gte:1,$lte:10}`).
#[derive(Debug, Clone)]
pub struct RawLeaf {
    /// Path the operators apply to.
    pub path: DottedPath,
    /// `(operator name, argument)` pairs, in document order.
    pub operators: Vec<(String, JsonValue)>,
}

/// Result of walking a query or constraint document.
#[derive(Debug, Clone)]
pub struct WalkResult {
    /// The structural-match residual: the portion of the document with no
    /// operators, to be matched via JSON containment.
    pub skeleton: JsonValue,
    /// Every operator leaf found, in document order (depth-first).
    pub leaves: Vec<RawLeaf>,
}

/// Walk a query/constraint document into its structural skeleton and its
/// operator leaves.
///
/// `doc` must be a JSON object; any other shape is a compile error.
pub fn walk(doc: &JsonValue) -> Result<WalkResult, String> {
    let map = doc
        .as_object()
        .ok_or_else(|| "query/constraint document must be a JSON object".to_string())?;

    let mut leaves = Vec::new();
    let skeleton = walk_object(map, &[], &mut leaves);
    Ok(WalkResult {
        skeleton: skeleton.unwrap_or_else(JsonValue::object),
        leaves,
    })
}

/// Walk one object level. Returns `None` when this subtree contributed no
/// structural residual (a pure operator leaf with no non-`$` subkeys) so
/// the caller can omit the key from its own skeleton entirely, rather than
/// inserting a vacuous empty object that would wrongly constrain the
/// field's shape.
fn walk_object(
    map: &Map<String, serde_json::Value>,
    prefix: &[String],
    leaves: &mut Vec<RawLeaf>,
) -> Option<JsonValue> {
    if map.is_empty() {
        // An explicit `{}` leaf is a structural match against an
        // (any-shaped) object — not an operator leaf with zero operators.
        return Some(JsonValue::object());
    }

    let mut skeleton_fields = Map::new();
    let mut ops_here = Vec::new();

    for (key, value) in map {
        if let Some(op_name) = key.strip_prefix('$') {
            ops_here.push((format!("${op_name}"), JsonValue::from(value.clone())));
        } else {
            let mut child_prefix = prefix.to_vec();
            child_prefix.push(key.clone());
            let child = walk_value(value, &child_prefix, leaves);
            if let Some(child_skeleton) = child {
                skeleton_fields.insert(key.clone(), child_skeleton.into_inner());
            }
        }
    }

    if !ops_here.is_empty() {
        leaves.push(RawLeaf {
            path: DottedPath::from_segments(prefix.to_vec()),
            operators: ops_here,
        });
    }

    if skeleton_fields.is_empty() {
        None
    } else {
        Some(JsonValue::from(serde_json::Value::Object(skeleton_fields)))
    }
}

fn walk_value(
    value: &serde_json::Value,
    prefix: &[String],
    leaves: &mut Vec<RawLeaf>,
) -> Option<JsonValue> {
    match value.as_object() {
        Some(map) => walk_object(map, prefix, leaves),
        None => Some(JsonValue::from(value.clone())),
    }
}
