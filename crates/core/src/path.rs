//! Dotted-path addressing into a [`JsonValue`](crate::JsonValue).
//!
//! A path is an ordered sequence of object keys, e.g. `a.b.c`. Resolution
//! walks objects key by key; arrays are not indexed by numeric path
//! segments in this engine (unlike the teacher's `JsonPath`, which supports
//! `items[0]` — that syntax has no place in Bedquilt's query/sort/constraint
//! languages). A missing key, or an intermediate value that isn't an
//! object, yields a distinguished *absent* result, kept distinct from a
//! present `Null` by returning `Option<&JsonValue>` where `None` means
//! absent and `Some(&JsonValue::Null)` means present-and-null.

use crate::value::JsonValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dotted path: an ordered sequence of object-key segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct DottedPath {
    segments: Vec<String>,
}

impl DottedPath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        DottedPath {
            segments: Vec::new(),
        }
    }

    /// Build a path directly from its segments (no splitting performed).
    pub fn from_segments(segments: Vec<String>) -> Self {
        DottedPath { segments }
    }

    /// Parse a dotted path string, e.g. `"user.profile.name"`. An empty
    /// string parses to the root path. Segments may not be empty
    /// (`"a..b"` and leading/trailing dots are rejected).
    pub fn parse(path: &str) -> Result<Self, String> {
        if path.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for part in path.split('.') {
            if part.is_empty() {
                return Err(format!("empty path segment in '{path}'"));
            }
            segments.push(part.to_string());
        }
        Ok(DottedPath { segments })
    }

    /// The path's segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// `true` if this is the root (empty) path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Re-render as a dotted string (inverse of [`DottedPath::parse`]).
    pub fn to_dotted_string(&self) -> String {
        self.segments.join(".")
    }

    /// Resolve this path against a document.
    ///
    /// Returns `None` if any intermediate segment traverses a non-object,
    /// or the key is missing at any level — this is the *absent* result.
    /// Returns `Some(&JsonValue::Null)` if the path resolves to a value
    /// that is present and `null`.
    pub fn resolve<'a>(&self, doc: &'a JsonValue) -> Option<&'a JsonValue> {
        let mut current = doc;
        for segment in &self.segments {
            current = current.get_field(segment)?;
        }
        Some(current)
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dotted_string())
    }
}

impl std::str::FromStr for DottedPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DottedPath::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_resolves_to_whole_document() {
        let doc: JsonValue = r#"{"a":1}"#.parse().unwrap();
        let resolved = DottedPath::root().resolve(&doc).unwrap();
        assert_eq!(resolved, &doc);
    }

    #[test]
    fn resolve_nested_path() {
        let doc: JsonValue = r#"{"user":{"profile":{"name":"Bob"}}}"#.parse().unwrap();
        let path = DottedPath::parse("user.profile.name").unwrap();
        assert_eq!(path.resolve(&doc).unwrap().as_str(), Some("Bob"));
    }

    #[test]
    fn resolve_missing_key_is_absent() {
        let doc: JsonValue = r#"{"a":1}"#.parse().unwrap();
        let path = DottedPath::parse("b").unwrap();
        assert!(path.resolve(&doc).is_none());
    }

    #[test]
    fn resolve_present_null_is_not_absent() {
        let doc: JsonValue = r#"{"a":null}"#.parse().unwrap();
        let path = DottedPath::parse("a").unwrap();
        let resolved = path.resolve(&doc);
        assert!(resolved.is_some());
        assert!(resolved.unwrap().is_null());
    }

    #[test]
    fn resolve_through_non_object_is_absent() {
        let doc: JsonValue = r#"{"a":1}"#.parse().unwrap();
        let path = DottedPath::parse("a.b").unwrap();
        assert!(path.resolve(&doc).is_none());
    }

    #[test]
    fn parse_rejects_empty_segments() {
        assert!(DottedPath::parse("a..b").is_err());
        assert!(DottedPath::parse(".a").is_err());
        assert!(DottedPath::parse("a.").is_err());
    }

    #[test]
    fn parse_empty_string_is_root() {
        assert!(DottedPath::parse("").unwrap().is_root());
    }

    #[test]
    fn to_dotted_string_round_trips() {
        let path = DottedPath::parse("a.b.c").unwrap();
        assert_eq!(path.to_dotted_string(), "a.b.c");
    }
}
