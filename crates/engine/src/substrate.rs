//! The `Substrate` trait: the abstract keyed-JSON store the engine is
//! built against, plus [`MemorySubstrate`], an in-memory reference
//! implementation used by tests and the default [`crate::Engine`].
//!
//! The real relational substrate (durable keyed storage over a
//! transactional session) is out of scope here; this crate only needs the
//! interface and a reference implementation faithful enough to exercise
//! every engine operation.

use bedquilt_core::JsonValue;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

/// A document as the substrate stores it: the body plus the two
/// engine-managed timestamps, keyed by its `_id`.
#[derive(Debug, Clone)]
pub struct StoredDoc {
    pub id: String,
    pub doc: JsonValue,
    pub created: i64,
    pub updated: i64,
}

/// The keyed-JSON store the engine is built against (§6).
///
/// Constraint compilation, storage, and enforcement live in the engine, not
/// here — `declare_constraint`/`drop_constraint` are pushdown hooks a real
/// relational substrate could use to install a native check constraint.
/// `MemorySubstrate`'s implementations are no-ops; constraint bookkeeping
/// is entirely [`crate::engine::Engine`]'s responsibility.
pub trait Substrate: Send + Sync {
    /// Create a collection. Returns `true` if newly created.
    fn create_collection(&self, name: &str) -> bool;

    /// Drop a collection and every document in it. Returns `true` if it
    /// existed.
    fn drop_collection(&self, name: &str) -> bool;

    /// `true` if the named collection exists (created explicitly or
    /// implicitly by a prior write).
    fn has_collection(&self, name: &str) -> bool;

    /// List collection names in creation order.
    fn list_collections(&self) -> Vec<String>;

    /// Insert a brand-new document. The caller guarantees `id` is not
    /// already present in `collection`.
    fn put(&self, collection: &str, id: &str, doc: JsonValue, created: i64, updated: i64);

    /// Replace the document at `id`, preserving its original `created` and
    /// setting `updated`. Returns `false` if `id` was not present (the
    /// caller is expected to `put` instead in that case).
    fn upsert(&self, collection: &str, id: &str, doc: JsonValue, updated: i64) -> bool;

    /// Fetch one document by id.
    fn get(&self, collection: &str, id: &str) -> Option<StoredDoc>;

    /// Every document currently stored in `collection`, in insertion order.
    /// An empty `Vec` for a missing collection, never an error.
    fn iterate(&self, collection: &str) -> Vec<StoredDoc>;

    /// Remove every document for which `predicate` returns `true`. Returns
    /// the number removed.
    fn delete_where(&self, collection: &str, predicate: &dyn Fn(&StoredDoc) -> bool) -> usize;

    /// Install a constraint pushdown hint. No-op for `MemorySubstrate`: the
    /// engine enforces constraints itself regardless of substrate support.
    fn declare_constraint(&self, collection: &str, name: &str);

    /// Remove a constraint pushdown hint installed by `declare_constraint`.
    fn drop_constraint(&self, collection: &str, name: &str);
}

#[derive(Debug, Default)]
struct CollectionDocs {
    docs: IndexMap<String, StoredDoc>,
}

/// In-memory reference [`Substrate`] implementation.
///
/// One `RwLock` guards the whole catalog: every top-level `Engine`
/// operation takes the write lock for its full duration, which is a
/// correct (if coarse) reading of "one transaction, no application-level
/// locks held between substrate calls" for a reference implementation —
/// a real relational substrate would offer finer per-row locking.
#[derive(Debug, Default)]
pub struct MemorySubstrate {
    collections: RwLock<IndexMap<String, CollectionDocs>>,
}

impl MemorySubstrate {
    pub fn new() -> Self {
        MemorySubstrate {
            collections: RwLock::new(IndexMap::new()),
        }
    }
}

impl Substrate for MemorySubstrate {
    fn create_collection(&self, name: &str) -> bool {
        let mut collections = self.collections.write();
        if collections.contains_key(name) {
            false
        } else {
            collections.insert(name.to_string(), CollectionDocs::default());
            debug!(collection = name, "collection created");
            true
        }
    }

    fn drop_collection(&self, name: &str) -> bool {
        let mut collections = self.collections.write();
        let removed = collections.shift_remove(name).is_some();
        if removed {
            debug!(collection = name, "collection dropped");
        }
        removed
    }

    fn has_collection(&self, name: &str) -> bool {
        self.collections.read().contains_key(name)
    }

    fn list_collections(&self) -> Vec<String> {
        self.collections.read().keys().cloned().collect()
    }

    fn put(&self, collection: &str, id: &str, doc: JsonValue, created: i64, updated: i64) {
        let mut collections = self.collections.write();
        let entry = collections.entry(collection.to_string()).or_default();
        entry.docs.insert(
            id.to_string(),
            StoredDoc {
                id: id.to_string(),
                doc,
                created,
                updated,
            },
        );
    }

    fn upsert(&self, collection: &str, id: &str, doc: JsonValue, updated: i64) -> bool {
        let mut collections = self.collections.write();
        let Some(entry) = collections.get_mut(collection) else {
            return false;
        };
        let Some(existing) = entry.docs.get_mut(id) else {
            return false;
        };
        existing.doc = doc;
        existing.updated = updated;
        true
    }

    fn get(&self, collection: &str, id: &str) -> Option<StoredDoc> {
        self.collections
            .read()
            .get(collection)
            .and_then(|c| c.docs.get(id))
            .cloned()
    }

    fn iterate(&self, collection: &str) -> Vec<StoredDoc> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.docs.values().cloned().collect())
            .unwrap_or_default()
    }

    fn delete_where(&self, collection: &str, predicate: &dyn Fn(&StoredDoc) -> bool) -> usize {
        let mut collections = self.collections.write();
        let Some(entry) = collections.get_mut(collection) else {
            return 0;
        };
        let before = entry.docs.len();
        entry.docs.retain(|_, stored| !predicate(stored));
        before - entry.docs.len()
    }

    fn declare_constraint(&self, collection: &str, name: &str) {
        debug!(collection, name, "declare_constraint (no-op on MemorySubstrate)");
    }

    fn drop_constraint(&self, collection: &str, name: &str) {
        debug!(collection, name, "drop_constraint (no-op on MemorySubstrate)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_collection_is_idempotent_reporting() {
        let sub = MemorySubstrate::new();
        assert!(sub.create_collection("things"));
        assert!(!sub.create_collection("things"));
    }

    #[test]
    fn put_then_get_roundtrips() {
        let sub = MemorySubstrate::new();
        sub.create_collection("things");
        let doc: JsonValue = r#"{"n":1}"#.parse().unwrap();
        sub.put("things", "abc", doc.clone(), 1, 1);
        let fetched = sub.get("things", "abc").unwrap();
        assert_eq!(fetched.doc, doc);
        assert_eq!(fetched.created, 1);
    }

    #[test]
    fn upsert_preserves_created_updates_updated() {
        let sub = MemorySubstrate::new();
        sub.create_collection("things");
        sub.put("things", "abc", r#"{"n":1}"#.parse().unwrap(), 10, 10);
        let updated: JsonValue = r#"{"n":2}"#.parse().unwrap();
        assert!(sub.upsert("things", "abc", updated.clone(), 20));
        let fetched = sub.get("things", "abc").unwrap();
        assert_eq!(fetched.doc, updated);
        assert_eq!(fetched.created, 10);
        assert_eq!(fetched.updated, 20);
    }

    #[test]
    fn iterate_missing_collection_is_empty() {
        let sub = MemorySubstrate::new();
        assert!(sub.iterate("nope").is_empty());
    }

    #[test]
    fn delete_where_removes_matching() {
        let sub = MemorySubstrate::new();
        sub.create_collection("things");
        sub.put("things", "a", r#"{"n":1}"#.parse().unwrap(), 1, 1);
        sub.put("things", "b", r#"{"n":2}"#.parse().unwrap(), 2, 2);
        let removed = sub.delete_where("things", &|d| d.id == "a");
        assert_eq!(removed, 1);
        assert_eq!(sub.iterate("things").len(), 1);
    }
}
