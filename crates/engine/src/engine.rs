//! The `Engine`: collection lifecycle, write operations, and the read
//! operation surface (§4.G, §4.H, §6), generic over a [`Substrate`].
//!
//! `Engine` owns the one piece of state the substrate doesn't: each
//! collection's compiled constraint set. Everything else — documents, the
//! collection catalog — is delegated to the substrate.

use crate::clock::Clock;
use crate::collection::CollectionState;
use crate::constraint::{self, CompiledConstraint};
use crate::cursor;
use crate::id;
use crate::substrate::{MemorySubstrate, StoredDoc, Substrate};
use bedquilt_core::value::deep_eq;
use bedquilt_core::{DottedPath, Error, JsonValue, Result};
use bedquilt_query::{compile_query, compile_sort, predicate};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::instrument;

/// The query/sort/constraint engine, generic over a [`Substrate`].
///
/// Defaults to [`MemorySubstrate`] — construct with [`Engine::new`] or
/// [`Engine::builder`] for the common in-memory case, or
/// [`Engine::with_substrate`] to run against a different store.
pub struct Engine<S: Substrate = MemorySubstrate> {
    substrate: S,
    clock: Clock,
    collections: RwLock<IndexMap<String, CollectionState>>,
}

impl Engine<MemorySubstrate> {
    /// A fresh engine over a new, empty [`MemorySubstrate`].
    pub fn new() -> Self {
        Engine::builder().build()
    }

    /// Start configuring an in-memory engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl Default for Engine<MemorySubstrate> {
    fn default() -> Self {
        Engine::new()
    }
}

/// Builder for an in-memory [`Engine`].
#[derive(Debug, Default)]
pub struct EngineBuilder {
    capacity_hint: Option<usize>,
}

impl EngineBuilder {
    /// Pre-size the internal collection-catalog map for `n` collections.
    /// Purely an allocation hint; has no effect on behavior.
    pub fn capacity_hint(mut self, n: usize) -> Self {
        self.capacity_hint = Some(n);
        self
    }

    pub fn build(self) -> Engine<MemorySubstrate> {
        let collections = match self.capacity_hint {
            Some(n) => IndexMap::with_capacity(n),
            None => IndexMap::new(),
        };
        Engine {
            substrate: MemorySubstrate::new(),
            clock: Clock::new(),
            collections: RwLock::new(collections),
        }
    }
}

impl<S: Substrate> Engine<S> {
    /// Build an engine over an already-constructed substrate.
    pub fn with_substrate(substrate: S) -> Self {
        Engine {
            substrate,
            clock: Clock::new(),
            collections: RwLock::new(IndexMap::new()),
        }
    }

    // ---- Collection lifecycle (§4.H) -------------------------------

    pub fn create_collection(&self, name: &str) -> Result<bool> {
        validate_collection_name(name)?;
        let created = self.substrate.create_collection(name);
        self.collections.write().entry(name.to_string()).or_default();
        Ok(created)
    }

    pub fn delete_collection(&self, name: &str) -> bool {
        let deleted = self.substrate.drop_collection(name);
        self.collections.write().shift_remove(name);
        deleted
    }

    pub fn list_collections(&self) -> Vec<String> {
        self.substrate.list_collections()
    }

    fn ensure_collection(&self, name: &str) -> Result<()> {
        validate_collection_name(name)?;
        self.substrate.create_collection(name);
        self.collections.write().entry(name.to_string()).or_default();
        Ok(())
    }

    // ---- Write operations (§4.G) ------------------------------------

    #[instrument(skip(self, doc), fields(collection = collection))]
    pub fn insert(&self, collection: &str, doc: JsonValue) -> Result<String> {
        self.ensure_collection(collection)?;
        let body = require_object(doc)?;
        let id = match resolve_id(&body)? {
            Some(id) => {
                if self.substrate.get(collection, &id).is_some() {
                    return Err(Error::DuplicateKey(id));
                }
                id
            }
            None => id::generate(),
        };
        self.write_new(collection, &id, body)
    }

    #[instrument(skip(self, doc), fields(collection = collection))]
    pub fn save(&self, collection: &str, doc: JsonValue) -> Result<String> {
        self.ensure_collection(collection)?;
        let body = require_object(doc)?;
        match resolve_id(&body)? {
            None => self.write_new(collection, &id::generate(), body),
            Some(id) => {
                if self.substrate.get(collection, &id).is_some() {
                    self.write_update(collection, &id, body)
                } else {
                    self.write_new(collection, &id, body)
                }
            }
        }
    }

    fn write_new(
        &self,
        collection: &str,
        id: &str,
        mut body: serde_json::Map<String, serde_json::Value>,
    ) -> Result<String> {
        body.insert("_id".to_string(), serde_json::Value::String(id.to_string()));
        let final_doc = JsonValue::from(serde_json::Value::Object(body));
        final_doc.validate_depth().map_err(Error::Type)?;
        self.check_constraints(collection, &final_doc)?;
        let now = self.clock.now();
        self.substrate.put(collection, id, final_doc, now, now);
        Ok(id.to_string())
    }

    fn write_update(
        &self,
        collection: &str,
        id: &str,
        mut body: serde_json::Map<String, serde_json::Value>,
    ) -> Result<String> {
        body.insert("_id".to_string(), serde_json::Value::String(id.to_string()));
        let final_doc = JsonValue::from(serde_json::Value::Object(body));
        final_doc.validate_depth().map_err(Error::Type)?;
        self.check_constraints(collection, &final_doc)?;
        let now = self.clock.now();
        self.substrate.upsert(collection, id, final_doc, now);
        Ok(id.to_string())
    }

    fn check_constraints(&self, collection: &str, doc: &JsonValue) -> Result<()> {
        let collections = self.collections.read();
        let Some(state) = collections.get(collection) else {
            return Ok(());
        };
        for c in state.constraints.values() {
            if !constraint::check(c, doc) {
                return Err(Error::ConstraintViolation(c.name.clone()));
            }
        }
        Ok(())
    }

    #[instrument(skip(self, query), fields(collection = collection))]
    pub fn remove(&self, collection: &str, query: &JsonValue) -> Result<usize> {
        let compiled = compile_query(query)?;
        Ok(self
            .substrate
            .delete_where(collection, &|d: &StoredDoc| predicate::matches(&compiled, &d.doc)))
    }

    pub fn remove_one(&self, collection: &str, query: &JsonValue) -> Result<usize> {
        let compiled = compile_query(query)?;
        let docs = self.substrate.iterate(collection);
        let matched = cursor::matched(docs, &compiled, &[]);
        match matched.into_iter().next() {
            Some(d) => {
                self.substrate
                    .delete_where(collection, &|x: &StoredDoc| x.id == d.id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    pub fn remove_one_by_id(&self, collection: &str, id: &str) -> usize {
        if self.substrate.get(collection, id).is_some() {
            self.substrate.delete_where(collection, &|d: &StoredDoc| d.id == id);
            1
        } else {
            0
        }
    }

    // ---- Read operations (§4.E, §6) ----------------------------------

    pub fn find(
        &self,
        collection: &str,
        query: &JsonValue,
        skip: usize,
        limit: Option<usize>,
        sort_spec: Option<&JsonValue>,
    ) -> Result<Vec<JsonValue>> {
        let compiled = compile_query(query)?;
        let sort_keys = match sort_spec {
            Some(spec) => compile_sort(spec)?,
            None => Vec::new(),
        };
        let docs = self.substrate.iterate(collection);
        Ok(cursor::run(docs, &compiled, &sort_keys, skip, limit))
    }

    pub fn find_one(
        &self,
        collection: &str,
        query: &JsonValue,
        skip: usize,
        sort_spec: Option<&JsonValue>,
    ) -> Result<Option<JsonValue>> {
        let mut docs = self.find(collection, query, skip, Some(1), sort_spec)?;
        Ok(docs.pop())
    }

    pub fn find_one_by_id(&self, collection: &str, id: &str) -> Option<JsonValue> {
        self.substrate.get(collection, id).map(|d| d.doc)
    }

    pub fn count(&self, collection: &str, query: Option<&JsonValue>) -> Result<usize> {
        let empty = JsonValue::object();
        let q = query.unwrap_or(&empty);
        let compiled = compile_query(q)?;
        let docs = self.substrate.iterate(collection);
        Ok(cursor::matched(docs, &compiled, &[]).len())
    }

    pub fn distinct(&self, collection: &str, path: &str) -> Result<Vec<JsonValue>> {
        let dotted = DottedPath::parse(path).map_err(Error::Compile)?;
        let docs = self.substrate.iterate(collection);
        let mut out: Vec<JsonValue> = Vec::new();
        for d in &docs {
            let value = dotted.resolve(&d.doc).cloned().unwrap_or_else(JsonValue::null);
            if !out.iter().any(|existing| deep_eq(existing, &value)) {
                out.push(value);
            }
        }
        Ok(out)
    }

    // ---- Constraint engine (§4.F) -------------------------------------

    #[instrument(skip(self, spec), fields(collection = collection))]
    pub fn add_constraint(&self, collection: &str, spec: &JsonValue) -> Result<bool> {
        self.ensure_collection(collection)?;
        let compiled = constraint::compile(spec)?;

        let mut collections = self.collections.write();
        let state = collections.entry(collection.to_string()).or_default();
        let new_ones: Vec<CompiledConstraint> = compiled
            .into_iter()
            .filter(|c| !state.constraints.contains_key(&c.name))
            .collect();
        if new_ones.is_empty() {
            return Ok(false);
        }

        let docs = self.substrate.iterate(collection);
        for c in &new_ones {
            if docs.iter().any(|d| !constraint::check(c, &d.doc)) {
                return Err(Error::ConstraintViolation(c.name.clone()));
            }
        }

        for c in new_ones {
            self.substrate.declare_constraint(collection, &c.name);
            state.constraints.insert(c.name.clone(), c);
        }
        Ok(true)
    }

    pub fn remove_constraint(&self, collection: &str, spec: &JsonValue) -> Result<bool> {
        let compiled = constraint::compile(spec)?;
        let mut collections = self.collections.write();
        let Some(state) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let mut removed_any = false;
        for c in compiled {
            if state.constraints.shift_remove(&c.name).is_some() {
                self.substrate.drop_constraint(collection, &c.name);
                removed_any = true;
            }
        }
        Ok(removed_any)
    }
}

fn validate_collection_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c == '_' || c.is_ascii_lowercase() => {
            chars.all(|c| c == '_' || c.is_ascii_lowercase() || c.is_ascii_digit())
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::Compile(format!(
            "invalid collection name '{name}': must match [a-z_][a-z0-9_]*"
        )))
    }
}

fn require_object(doc: JsonValue) -> Result<serde_json::Map<String, serde_json::Value>> {
    match doc.into_inner() {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(Error::Type("document must be a JSON object".to_string())),
    }
}

fn resolve_id(body: &serde_json::Map<String, serde_json::Value>) -> Result<Option<String>> {
    match body.get("_id") {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::Type("_id must be a string".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> JsonValue {
        json.parse().unwrap()
    }

    #[test]
    fn insert_generates_id_and_round_trips() {
        let engine = Engine::new();
        let id = engine.insert("things", doc(r#"{"n":1}"#)).unwrap();
        assert_eq!(id.len(), 24);
        let found = engine.find_one_by_id("things", &id).unwrap();
        assert_eq!(found.get_field("n").unwrap().as_number().unwrap().as_i64(), Some(1));
        assert_eq!(found.get_field("_id").unwrap().as_str(), Some(id.as_str()));
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let engine = Engine::new();
        engine.insert("things", doc(r#"{"_id":"abc"}"#)).unwrap();
        let err = engine.insert("things", doc(r#"{"_id":"abc"}"#)).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(_)));
    }

    #[test]
    fn insert_rejects_non_string_id() {
        let engine = Engine::new();
        let err = engine.insert("things", doc(r#"{"_id":5}"#)).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn save_upserts_preserving_created() {
        let engine = Engine::new();
        let id = engine
            .save("things", doc(r#"{"_id":"aaa","name":"spanner"}"#))
            .unwrap();
        let first = engine.find_one_by_id("things", &id).unwrap();
        let created1 = first.get_field("_id").is_some();
        assert!(created1);

        engine
            .save("things", doc(r#"{"_id":"aaa","name":"wrench"}"#))
            .unwrap();
        let second = engine.find_one_by_id("things", &id).unwrap();
        assert_eq!(second.get_field("name").unwrap().as_str(), Some("wrench"));

        let all = engine.find("things", &JsonValue::object(), 0, None, None).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn constraint_lifecycle_s4() {
        let engine = Engine::new();
        assert!(engine
            .add_constraint("things", &doc(r#"{"name":{"$required":true}}"#))
            .unwrap());

        let err = engine.insert("things", doc(r#"{"derp":1}"#)).unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));

        engine.insert("things", doc(r#"{"name":null}"#)).unwrap();

        assert!(engine
            .remove_constraint("things", &doc(r#"{"name":{"$required":true}}"#))
            .unwrap());
        assert!(!engine
            .remove_constraint("things", &doc(r#"{"name":{"$required":true}}"#))
            .unwrap());

        engine.insert("things", doc(r#"{"derp":1}"#)).unwrap();
    }

    #[test]
    fn add_constraint_is_retroactive_and_atomic() {
        let engine = Engine::new();
        engine.insert("things", doc(r#"{"derp":1}"#)).unwrap();
        let err = engine
            .add_constraint("things", &doc(r#"{"name":{"$required":true}}"#))
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));

        // Constraint set must be unchanged: a second identical add still
        // fails the same way rather than reporting "already present".
        let err2 = engine
            .add_constraint("things", &doc(r#"{"name":{"$required":true}}"#))
            .unwrap_err();
        assert!(matches!(err2, Error::ConstraintViolation(_)));
    }

    #[test]
    fn add_constraint_idempotent_reporting() {
        let engine = Engine::new();
        let spec = doc(r#"{"name":{"$required":true}}"#);
        assert!(engine.add_constraint("things", &spec).unwrap());
        assert!(!engine.add_constraint("things", &spec).unwrap());
    }

    #[test]
    fn remove_and_remove_one_and_count() {
        let engine = Engine::new();
        for n in 0..5 {
            engine.insert("things", doc(&format!(r#"{{"n":{n}}}"#))).unwrap();
        }
        assert_eq!(engine.count("things", None).unwrap(), 5);
        assert_eq!(
            engine
                .remove_one("things", &doc(r#"{}"#))
                .unwrap(),
            1
        );
        assert_eq!(engine.count("things", None).unwrap(), 4);
        let removed = engine.remove("things", &doc(r#"{}"#)).unwrap();
        assert_eq!(removed, 4);
        assert_eq!(engine.count("things", None).unwrap(), 0);
    }

    #[test]
    fn distinct_includes_null_for_missing() {
        let engine = Engine::new();
        engine.insert("things", doc(r#"{"color":"red"}"#)).unwrap();
        engine.insert("things", doc(r#"{"color":"blue"}"#)).unwrap();
        engine.insert("things", doc(r#"{}"#)).unwrap();
        let mut values = engine.distinct("things", "color").unwrap();
        values.sort_by_key(|v| v.to_string());
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn missing_collection_reads_are_empty_not_errors() {
        let engine = Engine::new();
        assert!(engine.find("nope", &JsonValue::object(), 0, None, None).unwrap().is_empty());
        assert_eq!(engine.count("nope", None).unwrap(), 0);
        assert_eq!(engine.remove("nope", &JsonValue::object()).unwrap(), 0);
    }

    #[test]
    fn insert_rejects_pathologically_nested_document() {
        let engine = Engine::new();
        let mut nested = serde_json::json!(1);
        for _ in 0..(JsonValue::MAX_NESTING_DEPTH + 1) {
            nested = serde_json::json!({ "n": nested });
        }
        let body: JsonValue = JsonValue::from(nested);
        let err = engine.insert("things", body).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
    }

    #[test]
    fn invalid_collection_name_is_compile_error() {
        let engine = Engine::new();
        let err = engine.insert("Not-Valid", doc(r#"{}"#)).unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }

    #[test]
    fn sort_by_synthetic_updated_key_s3() {
        let engine = Engine::new();
        let ids: Vec<String> = ["aa", "bb", "cc", "dd", "ee"]
            .iter()
            .map(|label| {
                engine
                    .insert("things", doc(&format!(r#"{{"label":"{label}"}}"#)))
                    .unwrap()
            })
            .collect();

        engine
            .save(
                "things",
                doc(&format!(r#"{{"_id":"{}","label":"bb"}}"#, ids[1])),
            )
            .unwrap();
        engine
            .save(
                "things",
                doc(&format!(r#"{{"_id":"{}","label":"dd"}}"#, ids[3])),
            )
            .unwrap();

        let sort_spec: JsonValue = r#"[{"$updated":1}]"#.parse().unwrap();
        let results = engine
            .find("things", &JsonValue::object(), 0, None, Some(&sort_spec))
            .unwrap();
        let labels: Vec<&str> = results
            .iter()
            .map(|d| d.get_field("label").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["aa", "cc", "ee", "bb", "dd"]);
    }
}
