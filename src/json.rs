//! Ergonomic acceptance of JSON-shaped arguments as either JSON text or an
//! already-parsed value (§6: "All JSON-shaped arguments are accepted as
//! JSON text or parsed JSON").

use bedquilt_core::{Error, JsonValue, Result};

/// Converts into a [`JsonValue`], parsing JSON text if necessary.
///
/// Implemented for `&str`/`String` (parsed with `serde_json`),
/// [`JsonValue`] (passed through), and `serde_json::Value` (wrapped).
/// Parse failures surface as [`Error::Compile`] — the query/document was
/// never well-formed JSON, so the caller's subsequent compile step never
/// runs.
pub trait IntoJson {
    /// Produce the [`JsonValue`], or a compile error if this was malformed
    /// JSON text.
    fn into_json(self) -> Result<JsonValue>;
}

impl IntoJson for JsonValue {
    fn into_json(self) -> Result<JsonValue> {
        Ok(self)
    }
}

impl IntoJson for &JsonValue {
    fn into_json(self) -> Result<JsonValue> {
        Ok(self.clone())
    }
}

impl IntoJson for serde_json::Value {
    fn into_json(self) -> Result<JsonValue> {
        Ok(JsonValue::from(self))
    }
}

impl IntoJson for &str {
    fn into_json(self) -> Result<JsonValue> {
        self.parse()
            .map_err(|e| Error::Compile(format!("malformed JSON: {e}")))
    }
}

impl IntoJson for String {
    fn into_json(self) -> Result<JsonValue> {
        self.as_str().into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_text_parses() {
        let v = r#"{"a":1}"#.into_json().unwrap();
        assert_eq!(v.get_field("a").unwrap().as_number().unwrap().as_i64(), Some(1));
    }

    #[test]
    fn malformed_json_text_is_compile_error() {
        let err = "{not json".into_json().unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }

    #[test]
    fn json_value_passes_through() {
        let v = JsonValue::object();
        assert_eq!(v.clone().into_json().unwrap(), v);
    }
}
