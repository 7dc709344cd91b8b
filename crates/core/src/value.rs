//! Canonical JSON value type.
//!
//! [`JsonValue`] is a `#[repr(transparent)]` newtype over `serde_json::Value`
//! rather than a hand-rolled enum: the workspace is built with the
//! `preserve_order` feature on `serde_json` so `Object` is backed by an
//! insertion-ordered map, which is what the document model requires (§3:
//! "ordered map from key→value with insertion order preserved").
//!
//! Two rules live here that the rest of the workspace depends on:
//!
//! - [`deep_eq`] — structural equality where `Number` compares by numeric
//!   value, never by textual form.
//! - [`try_compare`] — ordering that is only ever defined for two numbers
//!   or two strings; any other pairing is "incomparable" rather than an
//!   arbitrary `Less`/`Greater`.
//!
//! [`kind_rank`] additionally gives every value a position in the total
//! cross-type order the sort comparator uses:
//! `null < boolean < number < string < array < object`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

/// Canonical JSON value.
///
/// Six kinds are observable via [`JsonValue::kind_name`]: `null`,
/// `boolean`, `number`, `string`, `array`, `object` — these are exactly the
/// strings `$type` matches against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct JsonValue(serde_json::Value);

impl JsonValue {
    /// The JSON `null` value.
    pub fn null() -> Self {
        JsonValue(serde_json::Value::Null)
    }

    /// An empty JSON object.
    pub fn object() -> Self {
        JsonValue(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// An empty JSON array.
    pub fn array() -> Self {
        JsonValue(serde_json::Value::Array(Vec::new()))
    }

    /// Borrow the underlying `serde_json::Value`.
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consume and return the underlying `serde_json::Value`.
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// The type-tag name observable via `$type`: one of `null`, `boolean`,
    /// `number`, `string`, `array`, `object`.
    pub fn kind_name(&self) -> &'static str {
        match &self.0 {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }

    /// `true` if `name` is one of the six recognized `$type` kind names.
    pub fn is_valid_kind_name(name: &str) -> bool {
        matches!(
            name,
            "null" | "boolean" | "number" | "string" | "array" | "object"
        )
    }

    /// Rank of this value's kind in the cross-type total order used by the
    /// sort comparator: `null < boolean < number < string < array < object`.
    pub fn kind_rank(&self) -> u8 {
        match &self.0 {
            serde_json::Value::Null => 0,
            serde_json::Value::Bool(_) => 1,
            serde_json::Value::Number(_) => 2,
            serde_json::Value::String(_) => 3,
            serde_json::Value::Array(_) => 4,
            serde_json::Value::Object(_) => 5,
        }
    }

    /// Object field access, or `None` if this isn't an object or the key
    /// is absent.
    pub fn get_field(&self, key: &str) -> Option<&JsonValue> {
        match &self.0 {
            serde_json::Value::Object(map) => map.get(key).map(wrap_ref),
            _ => None,
        }
    }

    /// Borrow as an object map, if this is an object.
    pub fn as_object(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.0.as_object()
    }

    /// Borrow as an array, if this is an array.
    pub fn as_array(&self) -> Option<&Vec<serde_json::Value>> {
        self.0.as_array()
    }

    /// Borrow as a string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Borrow as a boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        self.0.as_bool()
    }

    /// Borrow as a `serde_json::Number`, if this is a number.
    pub fn as_number(&self) -> Option<&serde_json::Number> {
        self.0.as_number()
    }

    /// `true` if this value is JSON `null`.
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// The maximum nesting depth a stored document may have (objects and
    /// arrays count; scalars are depth 0). Guards the structural-match walk
    /// and the sort comparator's recursive tiebreak against pathologically
    /// deep documents — a resource-exhaustion vector the specification is
    /// silent on but the underlying store must still defend against.
    pub const MAX_NESTING_DEPTH: usize = 128;

    /// The depth of the deepest nested object/array in this value.
    pub fn nesting_depth(&self) -> usize {
        match &self.0 {
            serde_json::Value::Array(items) => {
                1 + items
                    .iter()
                    .map(|v| wrap_ref(v).nesting_depth())
                    .max()
                    .unwrap_or(0)
            }
            serde_json::Value::Object(map) => {
                1 + map
                    .values()
                    .map(|v| wrap_ref(v).nesting_depth())
                    .max()
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// `Ok(())` if this value's nesting depth is within
    /// [`JsonValue::MAX_NESTING_DEPTH`], else an error message naming the
    /// violation.
    pub fn validate_depth(&self) -> Result<(), String> {
        let depth = self.nesting_depth();
        if depth > Self::MAX_NESTING_DEPTH {
            Err(format!(
                "document nesting depth {depth} exceeds maximum of {}",
                Self::MAX_NESTING_DEPTH
            ))
        } else {
            Ok(())
        }
    }
}

fn wrap_ref(v: &serde_json::Value) -> &JsonValue {
    // SAFETY: JsonValue is #[repr(transparent)] over serde_json::Value, so
    // the two share layout and this reborrow is sound for the lifetime of
    // the input reference.
    unsafe { &*(v as *const serde_json::Value as *const JsonValue) }
}

impl FromStr for JsonValue {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(JsonValue)
    }
}

impl Deref for JsonValue {
    type Target = serde_json::Value;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for JsonValue {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for JsonValue {
    fn default() -> Self {
        Self::null()
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(v: serde_json::Value) -> Self {
        JsonValue(v)
    }
}

impl From<JsonValue> for serde_json::Value {
    fn from(v: JsonValue) -> Self {
        v.0
    }
}

impl From<bool> for JsonValue {
    fn from(v: bool) -> Self {
        JsonValue(serde_json::Value::Bool(v))
    }
}

impl From<i64> for JsonValue {
    fn from(v: i64) -> Self {
        JsonValue(serde_json::Value::Number(v.into()))
    }
}

impl From<f64> for JsonValue {
    fn from(v: f64) -> Self {
        JsonValue(
            serde_json::Number::from_f64(v)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
        )
    }
}

impl From<&str> for JsonValue {
    fn from(v: &str) -> Self {
        JsonValue(serde_json::Value::String(v.to_string()))
    }
}

impl From<String> for JsonValue {
    fn from(v: String) -> Self {
        JsonValue(serde_json::Value::String(v))
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(v: Vec<T>) -> Self {
        JsonValue(serde_json::Value::Array(
            v.into_iter().map(|x| x.into().0).collect(),
        ))
    }
}

/// Numeric equality by value: `5` equals `5.0`, regardless of which literal
/// form either was parsed from.
fn number_eq(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
        return ai == bi;
    }
    if let (Some(au), Some(bu)) = (a.as_u64(), b.as_u64()) {
        return au == bu;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(af), Some(bf)) => af == bf,
        _ => false,
    }
}

fn number_cmp(a: &serde_json::Number, b: &serde_json::Number) -> Option<Ordering> {
    if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
        return Some(ai.cmp(&bi));
    }
    if let (Some(au), Some(bu)) = (a.as_u64(), b.as_u64()) {
        return Some(au.cmp(&bu));
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(af), Some(bf)) => af.partial_cmp(&bf),
        _ => None,
    }
}

/// Deep structural equality, with `Number` compared by numeric value.
///
/// This is the equality used by `$eq`, `$noteq`, `$in`, `$notin`, and the
/// structural-match residual's containment check.
pub fn deep_eq(a: &JsonValue, b: &JsonValue) -> bool {
    use serde_json::Value::*;
    match (&a.0, &b.0) {
        (Null, Null) => true,
        (Bool(x), Bool(y)) => x == y,
        (Number(x), Number(y)) => number_eq(x, y),
        (String(x), String(y)) => x == y,
        (Array(x), Array(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|(xi, yi)| deep_eq(wrap_ref(xi), wrap_ref(yi)))
        }
        (Object(x), Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, xv)| y.get(k).is_some_and(|yv| deep_eq(wrap_ref(xv), wrap_ref(yv))))
        }
        _ => false,
    }
}

/// Ordering comparison, defined only when both sides are numbers or both
/// are strings. Any other pairing (including number-vs-string) returns
/// `None`, per spec: "for any other pairing the comparison yields false".
pub fn try_compare(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    use serde_json::Value::*;
    match (&a.0, &b.0) {
        (Number(x), Number(y)) => number_cmp(x, y),
        (String(x), String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total order used by the sort comparator across heterogeneous values:
/// compares within a kind by natural order, and across kinds by
/// [`JsonValue::kind_rank`].
pub fn total_order(a: &JsonValue, b: &JsonValue) -> Ordering {
    use serde_json::Value::*;
    match (&a.0, &b.0) {
        (Null, Null) => Ordering::Equal,
        (Bool(x), Bool(y)) => x.cmp(y),
        (Number(x), Number(y)) => number_cmp(x, y).unwrap_or(Ordering::Equal),
        (String(x), String(y)) => x.cmp(y),
        (Array(x), Array(y)) => {
            for (xi, yi) in x.iter().zip(y.iter()) {
                let ord = total_order(wrap_ref(xi), wrap_ref(yi));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Object(x), Object(y)) => {
            let mut xk: Vec<&String> = x.keys().collect();
            let mut yk: Vec<&String> = y.keys().collect();
            xk.sort();
            yk.sort();
            for (xi, yi) in xk.iter().zip(yk.iter()) {
                let ord = xi.cmp(yi);
                if ord != Ordering::Equal {
                    return ord;
                }
                let ord = total_order(wrap_ref(&x[*xi]), wrap_ref(&y[*yi]));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            xk.len().cmp(&yk.len())
        }
        _ => a.kind_rank().cmp(&b.kind_rank()),
    }
}

/// JSON containment: `container` contains `value` iff every path in
/// `container` exists in `value` with an equal leaf value (object leaves
/// are matched recursively; arrays must be equal outright).
pub fn contains(container: &JsonValue, value: &JsonValue) -> bool {
    match container.as_object() {
        Some(cmap) => match value.as_object() {
            Some(vmap) => cmap.iter().all(|(k, cv)| match vmap.get(k) {
                Some(vv) => contains(wrap_ref(cv), wrap_ref(vv)),
                None => false,
            }),
            None => false,
        },
        None => deep_eq(container, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_name_matches_six_tags() {
        assert_eq!(JsonValue::null().kind_name(), "null");
        assert_eq!(JsonValue::from(true).kind_name(), "boolean");
        assert_eq!(JsonValue::from(1i64).kind_name(), "number");
        assert_eq!(JsonValue::from("s").kind_name(), "string");
        assert_eq!(JsonValue::array().kind_name(), "array");
        assert_eq!(JsonValue::object().kind_name(), "object");
    }

    #[test]
    fn deep_eq_numeric_value_not_textual_form() {
        let a: JsonValue = "5".parse().unwrap();
        let b: JsonValue = "5.0".parse().unwrap();
        assert!(deep_eq(&a, &b));
    }

    #[test]
    fn deep_eq_distinguishes_types() {
        assert!(!deep_eq(&JsonValue::from("1"), &JsonValue::from(1i64)));
        assert!(!deep_eq(&JsonValue::null(), &JsonValue::from(false)));
    }

    #[test]
    fn deep_eq_object_ignores_key_order() {
        let a: JsonValue = r#"{"a":1,"b":2}"#.parse().unwrap();
        let b: JsonValue = r#"{"b":2,"a":1}"#.parse().unwrap();
        assert!(deep_eq(&a, &b));
    }

    #[test]
    fn try_compare_number_and_string_defined() {
        let a = JsonValue::from(1i64);
        let b = JsonValue::from(2i64);
        assert_eq!(try_compare(&a, &b), Some(Ordering::Less));

        let s1 = JsonValue::from("a");
        let s2 = JsonValue::from("b");
        assert_eq!(try_compare(&s1, &s2), Some(Ordering::Less));
    }

    #[test]
    fn try_compare_mismatched_types_is_none() {
        assert_eq!(try_compare(&JsonValue::from(1i64), &JsonValue::from("1")), None);
        assert_eq!(try_compare(&JsonValue::null(), &JsonValue::from(1i64)), None);
    }

    #[test]
    fn total_order_cross_type_ranking() {
        let values = [
            JsonValue::null(),
            JsonValue::from(true),
            JsonValue::from(1i64),
            JsonValue::from("s"),
            JsonValue::array(),
            JsonValue::object(),
        ];
        for w in values.windows(2) {
            assert_eq!(total_order(&w[0], &w[1]), Ordering::Less);
        }
    }

    #[test]
    fn contains_structural_match() {
        let container: JsonValue = r#"{"color":"red"}"#.parse().unwrap();
        let doc: JsonValue = r#"{"color":"red","n":1}"#.parse().unwrap();
        assert!(contains(&container, &doc));

        let doc2: JsonValue = r#"{"color":"blue","n":1}"#.parse().unwrap();
        assert!(!contains(&container, &doc2));
    }

    #[test]
    fn contains_nested_object() {
        let container: JsonValue = r#"{"nested":{"x":1}}"#.parse().unwrap();
        let doc: JsonValue = r#"{"nested":{"x":1,"y":2}}"#.parse().unwrap();
        assert!(contains(&container, &doc));
    }

    #[test]
    fn nesting_depth_counts_objects_and_arrays() {
        assert_eq!(JsonValue::from(1i64).nesting_depth(), 0);
        let v: JsonValue = r#"{"a":{"b":[1,2,{"c":3}]}}"#.parse().unwrap();
        assert_eq!(v.nesting_depth(), 3);
    }

    #[test]
    fn validate_depth_rejects_pathologically_nested_documents() {
        let mut deep = JsonValue::null();
        for _ in 0..(JsonValue::MAX_NESTING_DEPTH + 1) {
            deep = JsonValue::from(serde_json::json!({"n": deep.into_inner()}));
        }
        assert!(deep.validate_depth().is_err());
        assert!(JsonValue::object().validate_depth().is_ok());
    }

    #[test]
    fn object_preserves_insertion_order() {
        let v: JsonValue = r#"{"z":1,"a":2,"m":3}"#.parse().unwrap();
        let keys: Vec<&String> = v.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
