//! The read pipeline shared by `find`, `find_one`, `count`, `distinct`, and
//! used (without sort/skip/limit) by the delete paths: resolve collection →
//! match → sort → skip → limit → project (§4.E).
//!
//! Projection is currently identity: the stored document body, which
//! already carries its `_id` field. `created`/`updated` remain engine
//! metadata and are never included in a returned document.

use crate::substrate::StoredDoc;
use bedquilt_core::JsonValue;
use bedquilt_query::predicate;
use bedquilt_query::sort::{self, SortKey, SortableDoc};
use bedquilt_query::CompiledQuery;

/// Run the full cursor pipeline over a snapshot of a collection's
/// documents, returning projected document bodies in final order.
pub fn run(
    docs: Vec<StoredDoc>,
    query: &CompiledQuery,
    sort_keys: &[SortKey],
    skip: usize,
    limit: Option<usize>,
) -> Vec<JsonValue> {
    matched(docs, query, sort_keys)
        .into_iter()
        .skip(skip)
        .take(limit.unwrap_or(usize::MAX))
        .map(|d| d.doc)
        .collect()
}

/// Match and sort only, without skip/limit/projection — the shared core
/// used by `count` (needs only the count of matches) and the delete paths
/// (need the matching `StoredDoc`s, not just their bodies).
pub fn matched(
    docs: Vec<StoredDoc>,
    query: &CompiledQuery,
    sort_keys: &[SortKey],
) -> Vec<StoredDoc> {
    let mut out: Vec<StoredDoc> = docs
        .into_iter()
        .filter(|d| predicate::matches(query, &d.doc))
        .collect();

    if !sort_keys.is_empty() {
        out.sort_by(|a, b| {
            let sa = SortableDoc {
                value: &a.doc,
                created: a.created,
                updated: a.updated,
            };
            let sb = SortableDoc {
                value: &b.doc,
                created: b.created,
                updated: b.updated,
            };
            sort::compare(sort_keys, &sa, &sb)
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedquilt_query::compile_query;

    fn stored(id: &str, json: &str, created: i64, updated: i64) -> StoredDoc {
        StoredDoc {
            id: id.to_string(),
            doc: json.parse().unwrap(),
            created,
            updated,
        }
    }

    #[test]
    fn filters_then_limits() {
        let docs = vec![
            stored("a", r#"{"n":1}"#, 1, 1),
            stored("b", r#"{"n":2}"#, 2, 2),
            stored("c", r#"{"n":3}"#, 3, 3),
        ];
        let query = compile_query(&r#"{"n":{"$gte":2}}"#.parse().unwrap()).unwrap();
        let out = run(docs, &query, &[], 0, Some(1));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get_field("n").unwrap().as_number().unwrap().as_i64(), Some(2));
    }

    #[test]
    fn skip_beyond_end_is_empty() {
        let docs = vec![stored("a", r#"{"n":1}"#, 1, 1)];
        let query = compile_query(&JsonValue::object()).unwrap();
        let out = run(docs, &query, &[], 5, None);
        assert!(out.is_empty());
    }

    #[test]
    fn no_sort_preserves_insertion_order() {
        let docs = vec![
            stored("a", r#"{"n":1}"#, 1, 1),
            stored("b", r#"{"n":2}"#, 2, 2),
        ];
        let query = compile_query(&JsonValue::object()).unwrap();
        let out = run(docs, &query, &[], 0, None);
        assert_eq!(out[0].get_field("n").unwrap().as_number().unwrap().as_i64(), Some(1));
        assert_eq!(out[1].get_field("n").unwrap().as_number().unwrap().as_i64(), Some(2));
    }
}
