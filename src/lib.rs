//! # Bedquilt
//!
//! A JSON-document, collection-oriented data store: `insert` / `save` /
//! `find` / `remove` / `count` / `distinct`, with an operator-rich query
//! language, multi-key sort (including synthetic `$created`/`$updated`
//! keys), and a per-collection constraint engine (`$required`, `$notNull`,
//! `$type`).
//!
//! ## Quick start
//!
//! ```
//! use bedquilt::Bedquilt;
//!
//! let db = Bedquilt::new();
//! db.insert("things", r#"{"label":"a","n":1,"color":"red"}"#).unwrap();
//! db.insert("things", r#"{"label":"b","n":4,"color":"red"}"#).unwrap();
//!
//! let red: Vec<_> = db
//!     .find("things", r#"{"color":"red","n":{"$gte":2}}"#, 0, None, None::<&str>)
//!     .unwrap();
//! assert_eq!(red.len(), 1);
//! ```
//!
//! ## Layout
//!
//! This crate is a thin facade over three library crates:
//!
//! - [`bedquilt_core`] — the canonical JSON value, dotted-path addressing,
//!   and the shared error type.
//! - [`bedquilt_query`] — the query compiler, predicate evaluator, and sort
//!   specification language.
//! - [`bedquilt_engine`] — collection lifecycle, the constraint engine, the
//!   cursor pipeline, write operations, and the [`Substrate`] trait
//!   (plus its in-memory reference implementation).
//!
//! [`Substrate`]: bedquilt_engine::Substrate

#![warn(missing_docs)]

mod database;
mod json;

pub mod prelude;

pub use bedquilt_core::{Error, Result};
pub use database::{Bedquilt, BedquiltBuilder};
pub use json::IntoJson;

// Re-export the library crates for callers who want to build against the
// engine directly (e.g. over a custom `Substrate`) rather than the facade.
pub use bedquilt_core as core;
pub use bedquilt_engine as engine;
pub use bedquilt_query as query;
