//! Predicate evaluator: the reference semantics for matching a compiled
//! query against a candidate document.
//!
//! This is the fallback path used whenever the substrate cannot push a
//! clause down into a native predicate — see the design note in §9 of the
//! specification. An implementation is free to translate clauses into a
//! native form as long as observable results are identical to evaluating
//! them here.

use crate::compiler::{CompiledQuery, Op, QueryClause};
use bedquilt_core::value::{contains, deep_eq, try_compare};
use bedquilt_core::JsonValue;

/// Evaluate a compiled query against a candidate document: the structural
/// residual must match via containment, and every clause must hold.
/// Clauses are evaluated in order and short-circuit on the first `false`.
pub fn matches(query: &CompiledQuery, doc: &JsonValue) -> bool {
    if !contains(&query.skeleton, doc) {
        return false;
    }
    query.clauses.iter().all(|clause| eval_clause(clause, doc))
}

fn eval_clause(clause: &QueryClause, doc: &JsonValue) -> bool {
    let resolved = clause.path.resolve(doc);
    match &clause.op {
        Op::Eq(x) => resolved.is_some_and(|v| deep_eq(v, x)),
        // Matches the BedquiltDB original's `!=` translation (an absent
        // jsonb path is SQL NULL, and NULL != anything is NULL, i.e. no
        // match) rather than a literal reading of "absent" as satisfying
        // negation — see the S1 scenario and DESIGN.md's note on this.
        Op::NotEq(x) => resolved.is_some_and(|v| !deep_eq(v, x)),
        Op::Gt(x) => resolved.is_some_and(|v| try_compare(v, x) == Some(std::cmp::Ordering::Greater)),
        Op::Gte(x) => resolved.is_some_and(|v| {
            matches!(
                try_compare(v, x),
                Some(std::cmp::Ordering::Greater) | Some(std::cmp::Ordering::Equal)
            )
        }),
        Op::Lt(x) => resolved.is_some_and(|v| try_compare(v, x) == Some(std::cmp::Ordering::Less)),
        Op::Lte(x) => resolved.is_some_and(|v| {
            matches!(
                try_compare(v, x),
                Some(std::cmp::Ordering::Less) | Some(std::cmp::Ordering::Equal)
            )
        }),
        Op::In(items) => resolved.is_some_and(|v| items.iter().any(|item| deep_eq(v, item))),
        Op::NotIn(items) => !resolved.is_some_and(|v| items.iter().any(|item| deep_eq(v, item))),
        Op::Exists(expected) => resolved.is_some() == *expected,
        Op::Type(type_name) => resolved.is_some_and(|v| v.kind_name() == type_name),
        Op::Like(re) => resolved.is_some_and(|v| v.as_str().is_some_and(|s| re.is_match(s))),
        Op::Regex(re) => resolved.is_some_and(|v| v.as_str().is_some_and(|s| re.is_match(s))),
    }
}
