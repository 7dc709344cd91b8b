//! Query, predicate, and sort mini-languages.
//!
//! This crate has no notion of a collection or a substrate — it compiles
//! and evaluates the three declarative mini-languages spec'd for Bedquilt:
//!
//! - [`compiler`]: query documents → `(match_skeleton, clauses)`.
//! - [`predicate`]: evaluate a compiled query against a candidate document.
//! - [`sort`]: sort specs → a multi-key comparator, including the synthetic
//!   `$created`/`$updated` keys.
//! - [`leaf`]: the shared "walk an operator-leaf document" logic that both
//!   the query compiler and (from `bedquilt-engine`) the constraint
//!   compiler build on.
//! - [`like`]: SQL-style `LIKE` pattern matching for `$like`.

pub mod compiler;
pub mod leaf;
pub mod like;
pub mod predicate;
pub mod sort;

pub use compiler::{compile_query, CompiledQuery, Op, QueryClause};
pub use sort::{compile_sort, Direction, SortKey, SortSource, SortableDoc};
