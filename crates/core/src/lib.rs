//! Core JSON value and path model shared by every Bedquilt crate.
//!
//! This crate has no knowledge of collections, queries, or constraints —
//! it is the leaf of the workspace, providing:
//!
//! - [`value::JsonValue`]: the canonical tagged JSON value, plus the
//!   numeric/structural comparison rules the rest of the engine builds on.
//! - [`path::DottedPath`]: dotted-path addressing into a `JsonValue`.
//! - [`error::Error`]: the single error type shared across the workspace.

pub mod error;
pub mod path;
pub mod value;

pub use error::{Error, Result};
pub use path::DottedPath;
pub use value::JsonValue;
