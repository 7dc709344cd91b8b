//! Query compiler: turns a query document into a
//! `(match_skeleton, clauses)` pair, per the operator table:
//!
//! `$eq`, `$noteq`, `$gt`, `$gte`, `$lt`, `$lte`, `$in`, `$notin`,
//! `$exists`, `$type`, `$like`, `$regex`.

use crate::leaf::walk;
use crate::like::compile_like;
use bedquilt_core::{DottedPath, Error, JsonValue, Result};
use regex::Regex;

/// One compiled operator clause.
#[derive(Debug, Clone)]
pub enum Op {
    Eq(JsonValue),
    NotEq(JsonValue),
    Gt(JsonValue),
    Gte(JsonValue),
    Lt(JsonValue),
    Lte(JsonValue),
    In(Vec<JsonValue>),
    NotIn(Vec<JsonValue>),
    Exists(bool),
    Type(String),
    Like(Regex),
    Regex(Regex),
}

/// A compiled clause: an operator paired with the path it applies to.
#[derive(Debug, Clone)]
pub struct QueryClause {
    pub path: DottedPath,
    pub op: Op,
}

/// The result of compiling a query document: the structural-match residual
/// plus the ordered list of operator clauses. The full predicate is the
/// conjunction of the residual match and every clause.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub skeleton: JsonValue,
    pub clauses: Vec<QueryClause>,
}

impl CompiledQuery {
    /// `true` if this query has no structural residual and no clauses —
    /// matches every document.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
            && self
                .skeleton
                .as_object()
                .map(|m| m.is_empty())
                .unwrap_or(false)
    }
}

/// Compile a query document into its predicate form.
pub fn compile_query(doc: &JsonValue) -> Result<CompiledQuery> {
    let walked = walk(doc).map_err(Error::Compile)?;
    let mut clauses = Vec::new();
    for leaf in walked.leaves {
        for (name, arg) in leaf.operators {
            let op = compile_operator(&name, arg)?;
            clauses.push(QueryClause {
                path: leaf.path.clone(),
                op,
            });
        }
    }
    Ok(CompiledQuery {
        skeleton: walked.skeleton,
        clauses,
    })
}

fn compile_operator(name: &str, arg: JsonValue) -> Result<Op> {
    match name {
        "$eq" => Ok(Op::Eq(arg)),
        "$noteq" => Ok(Op::NotEq(arg)),
        "$gt" => Ok(Op::Gt(arg)),
        "$gte" => Ok(Op::Gte(arg)),
        "$lt" => Ok(Op::Lt(arg)),
        "$lte" => Ok(Op::Lte(arg)),
        "$in" => Ok(Op::In(expect_array(name, arg)?)),
        "$notin" => Ok(Op::NotIn(expect_array(name, arg)?)),
        "$exists" => Ok(Op::Exists(expect_bool(name, arg)?)),
        "$type" => {
            let type_name = expect_type_name(arg)?;
            Ok(Op::Type(type_name))
        }
        "$like" => {
            let pattern = expect_string(name, arg)?;
            let re = compile_like(&pattern).map_err(Error::Compile)?;
            Ok(Op::Like(re))
        }
        "$regex" => {
            let pattern = expect_string(name, arg)?;
            let re = Regex::new(&pattern)
                .map_err(|e| Error::Compile(format!("invalid $regex pattern '{pattern}': {e}")))?;
            Ok(Op::Regex(re))
        }
        other => Err(Error::Compile(format!("unknown operator '{other}'"))),
    }
}

fn expect_array(op: &str, arg: JsonValue) -> Result<Vec<JsonValue>> {
    match arg.into_inner() {
        serde_json::Value::Array(items) => Ok(items.into_iter().map(JsonValue::from).collect()),
        _ => Err(Error::Compile(format!("{op} requires an array argument"))),
    }
}

fn expect_bool(op: &str, arg: JsonValue) -> Result<bool> {
    arg.as_bool()
        .ok_or_else(|| Error::Compile(format!("{op} requires a boolean argument")))
}

fn expect_string(op: &str, arg: JsonValue) -> Result<String> {
    arg.as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| Error::Compile(format!("{op} requires a string argument")))
}

fn expect_type_name(arg: JsonValue) -> Result<String> {
    let name = arg
        .as_str()
        .ok_or_else(|| Error::Compile("$type requires a string argument".to_string()))?;
    if JsonValue::is_valid_kind_name(name) {
        Ok(name.to_string())
    } else {
        Err(Error::Compile(format!(
            "$type argument '{name}' is not one of null, boolean, number, string, array, object"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_only_query_has_no_clauses() {
        let doc: JsonValue = r#"{"color":"red"}"#.parse().unwrap();
        let compiled = compile_query(&doc).unwrap();
        assert!(compiled.clauses.is_empty());
    }

    #[test]
    fn operator_leaf_compiles_to_clause() {
        let doc: JsonValue = r#"{"n":{"$gte":8}}"#.parse().unwrap();
        let compiled = compile_query(&doc).unwrap();
        assert_eq!(compiled.clauses.len(), 1);
        assert!(matches!(compiled.clauses[0].op, Op::Gte(_)));
    }

    #[test]
    fn unknown_operator_is_compile_error() {
        let doc: JsonValue = r#"{"n":{"$bogus":1}}"#.parse().unwrap();
        let err = compile_query(&doc).unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }

    #[test]
    fn in_requires_array() {
        let doc: JsonValue = r#"{"n":{"$in":1}}"#.parse().unwrap();
        assert!(compile_query(&doc).is_err());
    }

    #[test]
    fn exists_requires_bool() {
        let doc: JsonValue = r#"{"n":{"$exists":"yes"}}"#.parse().unwrap();
        assert!(compile_query(&doc).is_err());
    }

    #[test]
    fn type_requires_known_kind_name() {
        let doc: JsonValue = r#"{"n":{"$type":"integer"}}"#.parse().unwrap();
        assert!(compile_query(&doc).is_err());

        let doc2: JsonValue = r#"{"n":{"$type":"number"}}"#.parse().unwrap();
        assert!(compile_query(&doc2).is_ok());
    }

    #[test]
    fn empty_query_matches_everything() {
        let compiled = compile_query(&JsonValue::object()).unwrap();
        assert!(compiled.is_empty());
    }

    #[test]
    fn like_and_regex_compile() {
        let doc: JsonValue = r#"{"name":{"$like":"a%"}}"#.parse().unwrap();
        assert!(compile_query(&doc).is_ok());

        let doc2: JsonValue = r#"{"name":{"$regex":"^a.*"}}"#.parse().unwrap();
        assert!(compile_query(&doc2).is_ok());

        let doc3: JsonValue = r#"{"name":{"$regex":"("}}"#.parse().unwrap();
        assert!(compile_query(&doc3).is_err());
    }
}
