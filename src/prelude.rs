//! Convenient imports for Bedquilt.
//!
//! ```
//! use bedquilt::prelude::*;
//!
//! let db = Bedquilt::new();
//! db.insert("things", r#"{"n":1}"#).unwrap();
//! ```

pub use crate::database::{Bedquilt, BedquiltBuilder};
pub use crate::json::IntoJson;
pub use crate::{Error, Result};

pub use bedquilt_core::JsonValue;
