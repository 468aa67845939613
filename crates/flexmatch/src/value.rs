//! Expected-value tree and canonical hashing support.
//!
//! Matchers nest: a subset map can declare a wildcard value, a prefix
//! sequence can contain a pattern, an embedded-JSON expectation can hold a
//! whole tree of the above. [`Expect`] is that tree. Plain JSON shapes
//! compare strictly (arrays by length and position, objects by exact key
//! set), but every child applies its own flexible equality, so wrappers
//! nested inside plain containers keep their semantics.
//!
//! [`SetKey`] is the canonical hashable projection used by unordered
//! sequence matching. Kinds whose equality is not an equivalence relation
//! have no projection and yield [`MatchError::Unhashable`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::{fail_on_misuse, MatchError};
use crate::matcher::url::UrlParts;
use crate::matcher::{
    AnyValue, CiStr, JsonText, NormalizedUrl, Pattern, RoundFloat, SeqPrefix, SubsetMap,
};

/// An expected value: a plain JSON shape, a matcher, or any nesting of both.
#[derive(Debug, Clone)]
pub enum Expect {
    /// Plain JSON null, compared strictly.
    Null,
    /// Plain boolean, compared strictly.
    Bool(bool),
    /// Plain number; integer and float representations of the same value
    /// compare equal.
    Number(Number),
    /// Plain string, compared strictly.
    String(String),
    /// Plain array: same length, pairwise flexible equality.
    Array(Vec<Expect>),
    /// Plain object: identical key set, values compared flexibly.
    Object(BTreeMap<String, Expect>),
    /// Wildcard, equal to everything.
    Any,
    /// Subset map matcher.
    Map(SubsetMap),
    /// Prefix sequence matcher.
    Seq(SeqPrefix),
    /// Anchored pattern matcher.
    Pattern(Pattern),
    /// Embedded-JSON matcher.
    Json(JsonText),
    /// Case-insensitive string matcher.
    CiStr(CiStr),
    /// Rounded float matcher.
    Float(RoundFloat),
    /// Normalized URL matcher.
    Url(NormalizedUrl),
}

impl Expect {
    /// Build an expectation from any serializable value.
    ///
    /// The value is rendered through `serde_json::to_value`, so the
    /// expectation compares the way its JSON form would.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, MatchError> {
        Ok(Expect::from(serde_json::to_value(value)?))
    }

    /// Check this expectation against a candidate value.
    ///
    /// The only possible error is [`MatchError::Unhashable`] from an
    /// unordered sequence somewhere in the tree; every type mismatch or
    /// decode failure is an `Ok(false)`.
    pub fn matches_value(&self, candidate: &Value) -> Result<bool, MatchError> {
        let matched = match self {
            Expect::Null => candidate.is_null(),
            Expect::Bool(expected) => candidate.as_bool() == Some(*expected),
            Expect::Number(expected) => match candidate {
                Value::Number(actual) => numbers_eq(expected, actual),
                _ => false,
            },
            Expect::String(expected) => candidate.as_str() == Some(expected.as_str()),
            Expect::Array(items) => match candidate.as_array() {
                Some(values) if values.len() == items.len() => {
                    for (item, value) in items.iter().zip(values) {
                        if !item.matches_value(value)? {
                            return Ok(false);
                        }
                    }
                    true
                }
                _ => false,
            },
            Expect::Object(entries) => match candidate.as_object() {
                Some(object) if object.len() == entries.len() => {
                    for (key, item) in entries {
                        let value = match object.get(key) {
                            Some(value) => value,
                            None => return Ok(false),
                        };
                        if !item.matches_value(value)? {
                            return Ok(false);
                        }
                    }
                    true
                }
                _ => false,
            },
            Expect::Any => true,
            Expect::Map(matcher) => matcher.matches_value(candidate)?,
            Expect::Seq(matcher) => matcher.matches_value(candidate)?,
            Expect::Pattern(matcher) => matcher.matches(candidate),
            Expect::Json(matcher) => matcher.matches_value(candidate)?,
            Expect::CiStr(matcher) => matcher.matches(candidate),
            Expect::Float(matcher) => matcher.matches(candidate),
            Expect::Url(matcher) => matcher.matches(candidate),
        };
        Ok(matched)
    }

    /// Infallible form of [`matches_value`](Self::matches_value); panics on
    /// the unordered-hashability misuse.
    pub fn matches(&self, candidate: &Value) -> bool {
        fail_on_misuse(self.matches_value(candidate))
    }

    /// Render a matcher-free subtree back into a plain JSON value.
    ///
    /// Returns `None` as soon as any wrapper kind appears in the tree.
    pub fn as_plain(&self) -> Option<Value> {
        match self {
            Expect::Null => Some(Value::Null),
            Expect::Bool(b) => Some(Value::Bool(*b)),
            Expect::Number(n) => Some(Value::Number(n.clone())),
            Expect::String(s) => Some(Value::String(s.clone())),
            Expect::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(item.as_plain()?);
                }
                Some(Value::Array(values))
            }
            Expect::Object(entries) => {
                let mut object = Map::new();
                for (key, item) in entries {
                    object.insert(key.clone(), item.as_plain()?);
                }
                Some(Value::Object(object))
            }
            _ => None,
        }
    }

    /// Flexible equality between two expectations.
    ///
    /// A wildcard on either side wins. If either side is a plain subtree it
    /// is compared through the other side's matching logic, so
    /// `Pattern vs "literal"` applies the pattern. Two matchers of the same
    /// kind compare structurally; matchers of different kinds are unequal.
    pub(crate) fn flex_eq(&self, other: &Expect) -> Result<bool, MatchError> {
        if matches!(self, Expect::Any) || matches!(other, Expect::Any) {
            return Ok(true);
        }
        if let Some(plain) = other.as_plain() {
            return self.matches_value(&plain);
        }
        if let Some(plain) = self.as_plain() {
            return other.matches_value(&plain);
        }
        match (self, other) {
            (Expect::Map(a), Expect::Map(b)) => a.flex_eq(b),
            (Expect::Seq(a), Expect::Seq(b)) => a.flex_eq(b),
            (Expect::Pattern(a), Expect::Pattern(b)) => Ok(a == b),
            (Expect::Json(a), Expect::Json(b)) => a.expected().flex_eq(b.expected()),
            (Expect::CiStr(a), Expect::CiStr(b)) => Ok(a == b),
            (Expect::Float(a), Expect::Float(b)) => Ok(a == b),
            (Expect::Url(a), Expect::Url(b)) => Ok(a == b),
            (Expect::Array(a), Expect::Array(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.iter().zip(b) {
                    if !x.flex_eq(y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Expect::Object(a), Expect::Object(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (key, x) in a {
                    let y = match b.get(key) {
                        Some(y) => y,
                        None => return Ok(false),
                    };
                    if !x.flex_eq(y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Canonical hashable projection, for unordered sequence matching.
    pub(crate) fn set_key(&self) -> Result<SetKey, MatchError> {
        match self {
            Expect::Null => Ok(SetKey::Null),
            Expect::Bool(b) => Ok(SetKey::Bool(*b)),
            Expect::Number(n) => Ok(number_key(n)),
            Expect::String(s) => Ok(SetKey::Str(s.clone())),
            Expect::Array(_) => Err(MatchError::Unhashable("array")),
            Expect::Object(_) => Err(MatchError::Unhashable("object")),
            Expect::Any => Err(MatchError::Unhashable("AnyValue")),
            Expect::Map(_) => Err(MatchError::Unhashable("SubsetMap")),
            Expect::Seq(_) => Err(MatchError::Unhashable("SeqPrefix")),
            Expect::Pattern(_) => Err(MatchError::Unhashable("Pattern")),
            Expect::Json(_) => Err(MatchError::Unhashable("JsonText")),
            Expect::CiStr(matcher) => Ok(SetKey::Str(matcher.as_str().to_owned())),
            Expect::Float(matcher) => Ok(float_key(matcher.value())),
            Expect::Url(matcher) => Ok(SetKey::Url(Box::new(matcher.parts().clone()))),
        }
    }
}

/// Canonical hashable form shared by expectations and candidate values.
///
/// Candidate values project as-is (no case folding, no rounding); hashable
/// matcher kinds project their normalized form. Numbers collapse so that
/// integer and float spellings of the same value collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum SetKey {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(u64),
    Str(String),
    Url(Box<UrlParts>),
}

/// Project a candidate value onto its canonical key.
///
/// Arrays and objects have no canonical key; using one inside an unordered
/// comparison is a misuse, not a mismatch.
pub(crate) fn value_key(candidate: &Value) -> Result<SetKey, MatchError> {
    match candidate {
        Value::Null => Ok(SetKey::Null),
        Value::Bool(b) => Ok(SetKey::Bool(*b)),
        Value::Number(n) => Ok(number_key(n)),
        Value::String(s) => Ok(SetKey::Str(s.clone())),
        Value::Array(_) => Err(MatchError::Unhashable("array")),
        Value::Object(_) => Err(MatchError::Unhashable("object")),
    }
}

pub(crate) fn number_key(number: &Number) -> SetKey {
    if let Some(i) = number.as_i64() {
        return SetKey::Int(i);
    }
    if let Some(u) = number.as_u64() {
        return SetKey::UInt(u);
    }
    float_key(number.as_f64().unwrap_or(f64::NAN))
}

/// Integral floats collapse onto the integer key so `1` and `1.0` collide.
pub(crate) fn float_key(value: f64) -> SetKey {
    if value.is_finite() && value == (value as i64) as f64 {
        return SetKey::Int(value as i64);
    }
    SetKey::Float(value.to_bits())
}

/// Numeric equality across integer and float representations.
pub(crate) fn numbers_eq(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

// ===== Conversions into Expect =====

impl From<Value> for Expect {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Expect::Null,
            Value::Bool(b) => Expect::Bool(b),
            Value::Number(n) => Expect::Number(n),
            Value::String(s) => Expect::String(s),
            Value::Array(values) => Expect::Array(values.into_iter().map(Expect::from).collect()),
            Value::Object(object) => Expect::Object(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Expect::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Expect {
    fn from(value: bool) -> Self {
        Expect::Bool(value)
    }
}

impl From<i64> for Expect {
    fn from(value: i64) -> Self {
        Expect::Number(Number::from(value))
    }
}

impl From<i32> for Expect {
    fn from(value: i32) -> Self {
        Expect::Number(Number::from(value))
    }
}

impl From<u64> for Expect {
    fn from(value: u64) -> Self {
        Expect::Number(Number::from(value))
    }
}

impl From<f64> for Expect {
    /// Non-finite floats become `Null`, matching `serde_json`'s rendering.
    fn from(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => Expect::Number(n),
            None => Expect::Null,
        }
    }
}

impl From<&str> for Expect {
    fn from(value: &str) -> Self {
        Expect::String(value.to_owned())
    }
}

impl From<String> for Expect {
    fn from(value: String) -> Self {
        Expect::String(value)
    }
}

impl<T: Into<Expect>> From<Vec<T>> for Expect {
    fn from(values: Vec<T>) -> Self {
        Expect::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<AnyValue> for Expect {
    fn from(_: AnyValue) -> Self {
        Expect::Any
    }
}

impl From<SubsetMap> for Expect {
    fn from(matcher: SubsetMap) -> Self {
        Expect::Map(matcher)
    }
}

impl From<SeqPrefix> for Expect {
    fn from(matcher: SeqPrefix) -> Self {
        Expect::Seq(matcher)
    }
}

impl From<Pattern> for Expect {
    fn from(matcher: Pattern) -> Self {
        Expect::Pattern(matcher)
    }
}

impl From<JsonText> for Expect {
    fn from(matcher: JsonText) -> Self {
        Expect::Json(matcher)
    }
}

impl From<CiStr> for Expect {
    fn from(matcher: CiStr) -> Self {
        Expect::CiStr(matcher)
    }
}

impl From<RoundFloat> for Expect {
    fn from(matcher: RoundFloat) -> Self {
        Expect::Float(matcher)
    }
}

impl From<NormalizedUrl> for Expect {
    fn from(matcher: NormalizedUrl) -> Self {
        Expect::Url(matcher)
    }
}

// ===== Symmetric equality =====

impl PartialEq for Expect {
    fn eq(&self, other: &Self) -> bool {
        fail_on_misuse(self.flex_eq(other))
    }
}

impl PartialEq<Value> for Expect {
    fn eq(&self, other: &Value) -> bool {
        fail_on_misuse(self.matches_value(other))
    }
}

impl PartialEq<Expect> for Value {
    fn eq(&self, other: &Expect) -> bool {
        other == self
    }
}

impl PartialEq<str> for Expect {
    fn eq(&self, other: &str) -> bool {
        fail_on_misuse(self.matches_value(&Value::String(other.to_owned())))
    }
}

impl PartialEq<&str> for Expect {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Expect {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<Expect> for str {
    fn eq(&self, other: &Expect) -> bool {
        other == self
    }
}

impl PartialEq<Expect> for &str {
    fn eq(&self, other: &Expect) -> bool {
        other == *self
    }
}

impl PartialEq<Expect> for String {
    fn eq(&self, other: &Expect) -> bool {
        other == self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_shapes_compare_strictly() {
        let expect = Expect::from(json!({"a": 1, "b": [1, 2]}));

        assert!(expect.matches(&json!({"a": 1, "b": [1, 2]})));
        // Extra key in the candidate fails a plain object.
        assert!(!expect.matches(&json!({"a": 1, "b": [1, 2], "c": 3})));
        // Extra element fails a plain array.
        assert!(!expect.matches(&json!({"a": 1, "b": [1, 2, 3]})));
    }

    #[test]
    fn test_numeric_equality_across_representations() {
        assert!(Expect::from(1i64).matches(&json!(1.0)));
        assert!(Expect::from(1.0).matches(&json!(1)));
        assert!(!Expect::from(1i64).matches(&json!(1.5)));
        assert_eq!(Expect::from(json!(2)), json!(2.0));
    }

    #[test]
    fn test_wildcard_nested_in_plain_containers() {
        let expect = Expect::from(vec![
            Expect::Any,
            Expect::Any,
            Expect::from(1i64),
        ]);

        assert!(expect.matches(&json!([1, 2, "foo"])));
        assert!(!expect.matches(&json!([1, 2, "foo", 4])));
        assert!(!expect.matches(&json!([1, 2])));
        assert!(!expect.matches(&json!(["a", "b", "c"])));
    }

    #[test]
    fn test_as_plain_roundtrip() {
        let value = json!({"a": [1, "two", null], "b": true});
        assert_eq!(Expect::from(value.clone()).as_plain(), Some(value));

        let with_matcher = Expect::Array(vec![Expect::Any]);
        assert_eq!(with_matcher.as_plain(), None);
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Payload {
            name: &'static str,
            count: u32,
        }

        let expect = Expect::from_serialize(&Payload {
            name: "a",
            count: 2,
        })
        .unwrap();
        assert!(expect.matches(&json!({"name": "a", "count": 2})));
    }

    #[test]
    fn test_set_key_number_collapse() {
        assert_eq!(value_key(&json!(1)).unwrap(), value_key(&json!(1.0)).unwrap());
        assert_ne!(value_key(&json!(1)).unwrap(), value_key(&json!(1.5)).unwrap());
        assert_eq!(float_key(-0.0), float_key(0.0));
    }

    #[test]
    fn test_set_key_rejects_containers() {
        assert!(matches!(
            value_key(&json!([1])),
            Err(MatchError::Unhashable("array"))
        ));
        assert!(matches!(
            value_key(&json!({"a": 1})),
            Err(MatchError::Unhashable("object"))
        ));
        assert!(matches!(
            Expect::Any.set_key(),
            Err(MatchError::Unhashable("AnyValue"))
        ));
    }

    #[test]
    fn test_symmetric_operand_order() {
        let expect = Expect::from(json!({"a": 1}));
        let value = json!({"a": 1});

        assert!(expect == value);
        assert!(value == expect);
        assert!(!(expect != value));
    }
}
