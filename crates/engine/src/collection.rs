//! Per-collection engine-level state.
//!
//! Document storage and the collection catalog are substrate concerns
//! (§6); the one thing the engine tracks independently is each
//! collection's active constraint set, since constraint compilation and
//! enforcement are engine-level, not substrate-level (§4.F).

use crate::constraint::CompiledConstraint;
use indexmap::IndexMap;

/// Constraint bookkeeping for one collection, keyed by canonical
/// constraint name so add/remove stay idempotent (I3).
#[derive(Debug, Default, Clone)]
pub struct CollectionState {
    pub constraints: IndexMap<String, CompiledConstraint>,
}
