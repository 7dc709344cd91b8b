//! Main entry point for Bedquilt.
//!
//! This module provides the [`Bedquilt`] struct, the facade callers use
//! instead of reaching into `bedquilt_engine::Engine` directly.

use crate::json::IntoJson;
use bedquilt_core::{JsonValue, Result};
use bedquilt_engine::{Engine, EngineBuilder as InnerBuilder, MemorySubstrate};

/// A Bedquilt document store: a query/sort/constraint engine over an
/// in-memory keyed-JSON substrate.
///
/// Construct with [`Bedquilt::new`] or [`Bedquilt::builder`]. Every
/// JSON-shaped argument accepts either a `&str` of JSON text or an
/// already-parsed [`JsonValue`] (see [`IntoJson`]).
pub struct Bedquilt {
    engine: Engine<MemorySubstrate>,
}

impl Bedquilt {
    /// Open a fresh, empty store.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a store.
    pub fn builder() -> BedquiltBuilder {
        BedquiltBuilder::default()
    }

    // ---- Collection lifecycle (§4.H) ---------------------------------

    /// Create a collection explicitly. Returns `true` if newly created,
    /// `false` if it already existed.
    pub fn create_collection(&self, name: &str) -> Result<bool> {
        self.engine.create_collection(name)
    }

    /// Delete a collection and every document in it. Returns `true` if it
    /// existed.
    pub fn delete_collection(&self, name: &str) -> bool {
        self.engine.delete_collection(name)
    }

    /// List collection names in creation order.
    pub fn list_collections(&self) -> Vec<String> {
        self.engine.list_collections()
    }

    // ---- Write operations (§4.G) --------------------------------------

    /// Insert a new document, generating `_id` if the caller did not
    /// supply one. Returns the `_id`.
    pub fn insert(&self, collection: &str, doc: impl IntoJson) -> Result<String> {
        self.engine.insert(collection, doc.into_json()?)
    }

    /// Upsert a document: inserts if `_id` is absent or not already
    /// present, otherwise replaces the stored document while preserving
    /// `created`. Returns the `_id`.
    pub fn save(&self, collection: &str, doc: impl IntoJson) -> Result<String> {
        self.engine.save(collection, doc.into_json()?)
    }

    // ---- Read operations (§4.E, §6) ------------------------------------

    /// Find documents matching `query`, ordered by `sort` (if any), after
    /// skipping `skip` and limiting to `limit` (if any).
    pub fn find(
        &self,
        collection: &str,
        query: impl IntoJson,
        skip: usize,
        limit: Option<usize>,
        sort: Option<impl IntoJson>,
    ) -> Result<Vec<JsonValue>> {
        let query = query.into_json()?;
        let sort = sort.map(IntoJson::into_json).transpose()?;
        self.engine
            .find(collection, &query, skip, limit, sort.as_ref())
    }

    /// `find` with an implicit limit of one.
    pub fn find_one(
        &self,
        collection: &str,
        query: impl IntoJson,
        skip: usize,
        sort: Option<impl IntoJson>,
    ) -> Result<Option<JsonValue>> {
        let query = query.into_json()?;
        let sort = sort.map(IntoJson::into_json).transpose()?;
        self.engine.find_one(collection, &query, skip, sort.as_ref())
    }

    /// Fetch a single document by its `_id`, bypassing the cursor
    /// pipeline entirely.
    pub fn find_one_by_id(&self, collection: &str, id: &str) -> Option<JsonValue> {
        self.engine.find_one_by_id(collection, id)
    }

    /// Count documents matching `query` (or every document, if `None`).
    pub fn count(&self, collection: &str, query: Option<impl IntoJson>) -> Result<usize> {
        let query = query.map(IntoJson::into_json).transpose()?;
        self.engine.count(collection, query.as_ref())
    }

    /// The distinct set of values found at `path` across a collection;
    /// missing values contribute a single `null`.
    pub fn distinct(&self, collection: &str, path: &str) -> Result<Vec<JsonValue>> {
        self.engine.distinct(collection, path)
    }

    /// Delete every document matching `query`. Returns the number removed.
    pub fn remove(&self, collection: &str, query: impl IntoJson) -> Result<usize> {
        self.engine.remove(collection, &query.into_json()?)
    }

    /// Delete at most one matching document, in insertion order. Returns
    /// `0` or `1`.
    pub fn remove_one(&self, collection: &str, query: impl IntoJson) -> Result<usize> {
        self.engine.remove_one(collection, &query.into_json()?)
    }

    /// Delete the document with the given `_id`. Returns `0` or `1`.
    pub fn remove_one_by_id(&self, collection: &str, id: &str) -> usize {
        self.engine.remove_one_by_id(collection, id)
    }

    // ---- Constraint engine (§4.F) ---------------------------------------

    /// Compile `spec` and add every constraint it names to `collection`.
    /// Returns `true` if at least one was newly added.
    pub fn add_constraint(&self, collection: &str, spec: impl IntoJson) -> Result<bool> {
        self.engine.add_constraint(collection, &spec.into_json()?)
    }

    /// Remove every constraint `spec` names from `collection`. Returns
    /// `true` if at least one was present and removed.
    pub fn remove_constraint(&self, collection: &str, spec: impl IntoJson) -> Result<bool> {
        self.engine.remove_constraint(collection, &spec.into_json()?)
    }
}

impl Default for Bedquilt {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a [`Bedquilt`] store.
#[derive(Debug, Default)]
pub struct BedquiltBuilder {
    inner: InnerBuilder,
}

impl BedquiltBuilder {
    /// Pre-size the internal collection catalog for `n` collections. An
    /// allocation hint only; has no effect on behavior.
    pub fn capacity_hint(mut self, n: usize) -> Self {
        self.inner = self.inner.capacity_hint(n);
        self
    }

    /// Build the store.
    pub fn build(self) -> Bedquilt {
        Bedquilt {
            engine: self.inner.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_find_one_by_id_round_trip() {
        let db = Bedquilt::new();
        let id = db.insert("things", r#"{"label":"a"}"#).unwrap();
        let found = db.find_one_by_id("things", &id).unwrap();
        assert_eq!(found.get_field("label").unwrap().as_str(), Some("a"));
    }

    #[test]
    fn find_accepts_json_text_query() {
        let db = Bedquilt::new();
        db.insert("things", r#"{"n":1}"#).unwrap();
        db.insert("things", r#"{"n":2}"#).unwrap();
        let results = db
            .find(
                "things",
                r#"{"n":{"$gte":2}}"#,
                0,
                None,
                None::<&str>,
            )
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn builder_capacity_hint_is_inert() {
        let db = Bedquilt::builder().capacity_hint(16).build();
        assert!(db.list_collections().is_empty());
    }
}
