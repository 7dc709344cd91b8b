//! Constraint compilation and enforcement.
//!
//! A constraint document compiles through the same operator-leaf walk the
//! query compiler uses ([`bedquilt_query::leaf::walk`]), but the only
//! recognized leaf operators are `$required`, `$notNull`, and `$type` —a
//! disjoint vocabulary from the query language's operators, enforced by
//! rejecting anything else at compile time.

use bedquilt_core::{DottedPath, Error, JsonValue, Result};
use bedquilt_query::leaf::walk;

/// One compiled constraint operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Path must be present (value may be `null`).
    Required,
    /// Path must be present and not `null`.
    NotNull,
    /// If present, the value's kind must match.
    Type(String),
}

/// A named constraint: the path it applies to, its operator, and the
/// canonical name used for add/remove idempotence (I3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledConstraint {
    pub name: String,
    pub path: DottedPath,
    pub op: ConstraintOp,
}

/// Compile a constraint document into its list of named constraints.
///
/// A single document can name more than one constraint (e.g.
/// `{"name":{"$required":true},"age":{"$type":"number"}}`).
pub fn compile(spec: &JsonValue) -> Result<Vec<CompiledConstraint>> {
    let walked = walk(spec).map_err(Error::Compile)?;
    if walked
        .skeleton
        .as_object()
        .map(|m| !m.is_empty())
        .unwrap_or(false)
    {
        return Err(Error::Compile(
            "constraint document must consist only of operator leaves".to_string(),
        ));
    }

    let mut compiled = Vec::new();
    for leaf in walked.leaves {
        for (op_name, arg) in leaf.operators {
            let (tag, op) = compile_operator(&op_name, arg)?;
            let name = canonical_name(tag, &leaf.path);
            compiled.push(CompiledConstraint {
                name,
                path: leaf.path.clone(),
                op,
            });
        }
    }
    Ok(compiled)
}

fn compile_operator(name: &str, arg: JsonValue) -> Result<(&'static str, ConstraintOp)> {
    match name {
        "$required" => match arg.as_bool() {
            Some(true) => Ok(("required", ConstraintOp::Required)),
            _ => Err(Error::Compile(
                "$required constraint argument must be `true`".to_string(),
            )),
        },
        "$notNull" => {
            if is_truthy(&arg) {
                Ok(("notNull", ConstraintOp::NotNull))
            } else {
                Err(Error::Compile(
                    "$notNull constraint argument must be truthy".to_string(),
                ))
            }
        }
        "$type" => {
            let kind = arg.as_str().ok_or_else(|| {
                Error::Compile("$type constraint argument must be a string".to_string())
            })?;
            if JsonValue::is_valid_kind_name(kind) {
                Ok(("type", ConstraintOp::Type(kind.to_string())))
            } else {
                Err(Error::Compile(format!(
                    "$type constraint argument '{kind}' is not a recognized kind name"
                )))
            }
        }
        other => Err(Error::Compile(format!(
            "unknown constraint operator '{other}'"
        ))),
    }
}

fn is_truthy(v: &JsonValue) -> bool {
    match v.as_inner() {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

fn canonical_name(tag: &str, path: &DottedPath) -> String {
    format!("{tag}_{}", path.to_dotted_string())
}

/// Check one compiled constraint against a candidate document.
pub fn check(constraint: &CompiledConstraint, doc: &JsonValue) -> bool {
    let resolved = constraint.path.resolve(doc);
    match &constraint.op {
        ConstraintOp::Required => resolved.is_some(),
        ConstraintOp::NotNull => resolved.is_some_and(|v| !v.is_null()),
        ConstraintOp::Type(kind) => resolved.map(|v| v.kind_name() == kind).unwrap_or(true),
    }
}
