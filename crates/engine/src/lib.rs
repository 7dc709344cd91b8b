//! Collection lifecycle, write operations, the constraint engine, and the
//! cursor pipeline — the parts of Bedquilt that sit above the query/sort
//! mini-languages in `bedquilt-query` and below the root facade.

pub mod clock;
pub mod collection;
pub mod constraint;
pub mod cursor;
pub mod engine;
pub mod id;
pub mod substrate;

pub use constraint::{CompiledConstraint, ConstraintOp};
pub use engine::{Engine, EngineBuilder};
pub use substrate::{MemorySubstrate, StoredDoc, Substrate};
