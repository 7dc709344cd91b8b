//! Unified error type for Bedquilt.
//!
//! Every crate in the workspace returns this [`Error`] (via [`Result`]); it
//! is the single place that maps onto the error kinds named in the engine's
//! error-handling design:
//!
//! - [`Error::Compile`] — unknown operator, ill-formed operator argument,
//!   bad sort entry, invalid collection name. Raised before any mutation.
//! - [`Error::Type`] — non-string `_id`, non-object document/query.
//! - [`Error::DuplicateKey`] — `insert` with an `_id` already present.
//! - [`Error::ConstraintViolation`] — a write rejected by an active
//!   constraint, or `add_constraint` against data that already violates it.
//! - [`Error::Substrate`] — propagated verbatim from the storage substrate.

use thiserror::Error as ThisError;

/// All Bedquilt errors.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The query, sort spec, constraint spec, or collection name could not
    /// be compiled: unknown operator, malformed argument, bad name, etc.
    #[error("compile error: {0}")]
    Compile(String),

    /// A value was the wrong JSON type for the position it appeared in
    /// (e.g. a non-string `_id`, or a non-object document).
    #[error("type error: {0}")]
    Type(String),

    /// `insert` was called with an `_id` that already exists in the
    /// collection.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A write was rejected by an active constraint, or `add_constraint`
    /// was rejected because an existing document already violates it.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// An error propagated verbatim from the storage substrate.
    #[error("substrate error: {0}")]
    Substrate(String),
}

/// Result type for Bedquilt operations.
pub type Result<T> = std::result::Result<T, Error>;
