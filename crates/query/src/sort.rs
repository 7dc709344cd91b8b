//! Sort specification language and comparator.
//!
//! A sort spec is a JSON array of single-key objects, each naming one
//! ordering key: a dotted path, or one of the synthetic keys `$created` /
//! `$updated`. Keys apply in array order (first key is primary).
//!
//! Synthetic keys are engine metadata, not part of the document body — the
//! comparator consults them directly via [`SortableDoc`] rather than
//! resolving them as paths, so they never collide with a real field named
//! `created`/`updated` inside the document.

use bedquilt_core::value::total_order;
use bedquilt_core::{DottedPath, Error, JsonValue, Result};
use std::cmp::Ordering;

/// Ascending (`1`) or descending (`-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// What a sort key orders by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortSource {
    Path(DottedPath),
    Created,
    Updated,
}

/// One compiled sort key.
#[derive(Debug, Clone)]
pub struct SortKey {
    pub source: SortSource,
    pub direction: Direction,
}

/// Compile a sort spec: a JSON array of single-key `{path: ±1}` objects.
pub fn compile_sort(spec: &JsonValue) -> Result<Vec<SortKey>> {
    let items = spec
        .as_array()
        .ok_or_else(|| Error::Compile("sort spec must be a JSON array".to_string()))?;

    let mut keys = Vec::with_capacity(items.len());
    for item in items {
        let obj = item
            .as_object()
            .ok_or_else(|| Error::Compile("each sort entry must be a single-key object".to_string()))?;
        if obj.len() != 1 {
            return Err(Error::Compile(
                "each sort entry must have exactly one key".to_string(),
            ));
        }
        let (key, dir_value) = obj.iter().next().unwrap();
        let direction = match dir_value.as_i64() {
            Some(1) => Direction::Ascending,
            Some(-1) => Direction::Descending,
            _ => {
                return Err(Error::Compile(format!(
                    "sort direction for '{key}' must be 1 or -1"
                )))
            }
        };
        let source = match key.as_str() {
            "$created" => SortSource::Created,
            "$updated" => SortSource::Updated,
            path => SortSource::Path(
                DottedPath::parse(path).map_err(Error::Compile)?,
            ),
        };
        keys.push(SortKey { source, direction });
    }
    Ok(keys)
}

/// A document plus the engine-managed timestamps the sort comparator needs
/// for `$created`/`$updated`, without the timestamps being part of the
/// document body.
#[derive(Debug, Clone, Copy)]
pub struct SortableDoc<'a> {
    pub value: &'a JsonValue,
    pub created: i64,
    pub updated: i64,
}

/// Compare two documents against a compiled multi-key sort spec.
///
/// Absence sorts after any present value (missing-last) for ascending
/// order; descending order reverses the whole comparison, including that
/// tie-break, so it remains a well-defined total order either way.
pub fn compare(keys: &[SortKey], a: &SortableDoc, b: &SortableDoc) -> Ordering {
    for key in keys {
        let ord = compare_one(key, a, b);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn compare_one(key: &SortKey, a: &SortableDoc, b: &SortableDoc) -> Ordering {
    let ord = match &key.source {
        SortSource::Created => a.created.cmp(&b.created),
        SortSource::Updated => a.updated.cmp(&b.updated),
        SortSource::Path(path) => {
            let av = path.resolve(a.value);
            let bv = path.resolve(b.value);
            match (av, bv) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => total_order(x, y),
            }
        }
    };
    match key.direction {
        Direction::Ascending => ord,
        Direction::Descending => ord.reverse(),
    }
}

/// Build a `Vec`-sortable comparator closure from a compiled sort spec.
pub fn comparator(keys: Vec<SortKey>) -> impl Fn(&SortableDoc, &SortableDoc) -> Ordering {
    move |a, b| compare(&keys, a, b)
}
