//! Embedded-JSON matcher.

use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::error::{fail_on_misuse, MatchError};
use crate::value::Expect;

/// An expectation against the decoded form of a JSON string.
///
/// Equal to any string (or UTF-8 byte) candidate that decodes to a value
/// flexibly equal to the stored expectation. The expectation is an
/// [`Expect`] tree, so wrappers nest inside it. Invalid UTF-8 and invalid
/// JSON are mismatches, caught internally, never errors. Candidates that
/// are not strings or bytes are simply not equal.
///
/// The decoded comparison is structural and exact in shape: extra keys in
/// the decoded object fail unless the expectation itself is a
/// [`SubsetMap`](crate::SubsetMap).
///
/// Embedded-JSON equality is not an equivalence relation, so `JsonText`
/// does not implement `Hash`.
#[derive(Debug, Clone)]
pub struct JsonText {
    expected: Box<Expect>,
}

impl JsonText {
    /// Build an expectation from anything convertible into an [`Expect`]
    /// tree (a `serde_json::Value`, a scalar, another matcher).
    pub fn new(expected: impl Into<Expect>) -> Self {
        JsonText {
            expected: Box::new(expected.into()),
        }
    }

    /// Build an expectation from any serializable value.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, MatchError> {
        Ok(JsonText::new(Expect::from_serialize(value)?))
    }

    /// The stored expectation.
    pub fn expected(&self) -> &Expect {
        &self.expected
    }

    /// Check the candidate value; only strings can match.
    pub fn matches_value(&self, candidate: &Value) -> Result<bool, MatchError> {
        match candidate {
            Value::String(text) => self.matches_str_value(text),
            _ => Ok(false),
        }
    }

    /// Decode a string candidate and compare the decoded value.
    pub fn matches_str_value(&self, candidate: &str) -> Result<bool, MatchError> {
        match serde_json::from_str::<Value>(candidate) {
            Ok(decoded) => self.expected.matches_value(&decoded),
            Err(err) => {
                trace!("candidate is not valid json: {err}");
                Ok(false)
            }
        }
    }

    /// Decode a byte candidate; invalid UTF-8 is a mismatch.
    pub fn matches_bytes_value(&self, candidate: &[u8]) -> Result<bool, MatchError> {
        match std::str::from_utf8(candidate) {
            Ok(text) => self.matches_str_value(text),
            Err(err) => {
                trace!("byte candidate is not valid utf-8: {err}");
                Ok(false)
            }
        }
    }

    /// Infallible form of [`matches_value`](Self::matches_value).
    pub fn matches(&self, candidate: &Value) -> bool {
        fail_on_misuse(self.matches_value(candidate))
    }
}

impl PartialEq for JsonText {
    fn eq(&self, other: &Self) -> bool {
        fail_on_misuse(self.expected.flex_eq(&other.expected))
    }
}

impl PartialEq<Value> for JsonText {
    fn eq(&self, other: &Value) -> bool {
        self.matches(other)
    }
}

impl PartialEq<JsonText> for Value {
    fn eq(&self, other: &JsonText) -> bool {
        other.matches(self)
    }
}

impl PartialEq<str> for JsonText {
    fn eq(&self, other: &str) -> bool {
        fail_on_misuse(self.matches_str_value(other))
    }
}

impl PartialEq<&str> for JsonText {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for JsonText {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<JsonText> for str {
    fn eq(&self, other: &JsonText) -> bool {
        other == self
    }
}

impl PartialEq<JsonText> for &str {
    fn eq(&self, other: &JsonText) -> bool {
        other == *self
    }
}

impl PartialEq<JsonText> for String {
    fn eq(&self, other: &JsonText) -> bool {
        other == self.as_str()
    }
}

impl PartialEq<[u8]> for JsonText {
    fn eq(&self, other: &[u8]) -> bool {
        fail_on_misuse(self.matches_bytes_value(other))
    }
}

impl PartialEq<JsonText> for [u8] {
    fn eq(&self, other: &JsonText) -> bool {
        other == self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{SubsetMap, ANY};
    use serde_json::json;

    #[test]
    fn test_decoded_structural_match() {
        let expected = JsonText::new(json!({"foo": 1, "bar": "hello"}));
        let candidate = r#"{"bar": "hello", "foo": 1}"#;

        assert!(expected == candidate);
        assert!(candidate == expected);
        assert!(!(expected != candidate));
    }

    #[test]
    fn test_exact_shape_required() {
        let expected = JsonText::new(json!({"a": 1}));

        assert!(expected == r#"{"a": 1}"#);
        assert!(expected != r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn test_invalid_json_is_a_mismatch() {
        let expected = JsonText::new(json!({"a": 1}));

        assert!(expected != "not json");
        assert!("not json" != expected);
    }

    #[test]
    fn test_non_string_candidates_are_not_equal() {
        let expected = JsonText::new(json!({"a": 1}));

        assert!(expected != json!(1));
        assert!(json!(1) != expected);
        assert!(expected != json!({"a": 1}));
    }

    #[test]
    fn test_top_level_scalar() {
        let expected = JsonText::new("json str");
        assert!(expected == r#""json str""#);
        assert!(r#""json str""# == expected);
    }

    #[test]
    fn test_byte_candidates() {
        let expected = JsonText::new(json!([1, 2]));

        assert!(expected == b"[1, 2]"[..]);
        assert!(expected != b"\xff\xfe"[..]);
    }

    #[test]
    fn test_same_kind_compares_expectations() {
        let a = JsonText::new(json!({"a": 1}));
        let b = JsonText::new(json!({"a": 1}));
        let c = JsonText::new(json!({"a": 2}));

        assert!(a == b);
        assert!(a != c);
    }

    #[test]
    fn test_nested_matchers_inside_expectation() {
        let expected = JsonText::new(SubsetMap::new([
            ("id", Expect::from(ANY)),
            ("name", Expect::from("alpha")),
        ]));

        assert!(expected == r#"{"id": 17, "name": "alpha", "extra": true}"#);
        assert!(expected != r#"{"name": "alpha"}"#);
    }
}
