//! Prefix sequence matcher.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{fail_on_misuse, MatchError};
use crate::value::{value_key, Expect};

/// A sequence expectation that tolerates extra trailing elements.
///
/// Ordered mode (the default): equal to any array at least as long whose
/// first N elements pairwise match the N declared expectations; anything
/// after position N is ignored. Declared elements are [`Expect`] trees, so
/// wrappers nest.
///
/// Unordered mode ([`unordered`](Self::unordered)): equal to any array
/// whose elements, as a set, cover every declared element; order and
/// candidate duplicates are irrelevant. Set semantics require a canonical
/// hashable form on both sides, so declaring (or meeting) a wildcard, a
/// nested container, or another unhashable matcher under unordered mode is
/// a misuse: the checked API reports [`MatchError::Unhashable`] and the
/// `==` operator panics with it. A silent `false` would mask the bug.
///
/// Prefix equality is not an equivalence relation, so `SeqPrefix` does not
/// implement `Hash`.
#[derive(Debug, Clone)]
pub struct SeqPrefix {
    items: Vec<Expect>,
    ignore_order: bool,
}

impl SeqPrefix {
    /// Build an ordered prefix expectation.
    pub fn new<T, I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Expect>,
    {
        SeqPrefix {
            items: items.into_iter().map(Into::into).collect(),
            ignore_order: false,
        }
    }

    /// Build an order-insensitive expectation.
    pub fn unordered<T, I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Expect>,
    {
        SeqPrefix {
            items: items.into_iter().map(Into::into).collect(),
            ignore_order: true,
        }
    }

    /// Whether this expectation ignores element order.
    pub fn is_unordered(&self) -> bool {
        self.ignore_order
    }

    /// Number of declared elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no elements are declared (matches any array).
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check the prefix (or coverage) constraint against a candidate value.
    ///
    /// Non-array candidates are simply not equal. `Err` is only possible in
    /// unordered mode, when either side holds an element without a
    /// canonical hashable form.
    pub fn matches_value(&self, candidate: &Value) -> Result<bool, MatchError> {
        match candidate.as_array() {
            Some(values) => self.matches_slice(values),
            None => Ok(false),
        }
    }

    /// Check the prefix (or coverage) constraint against a candidate slice.
    pub fn matches_slice(&self, values: &[Value]) -> Result<bool, MatchError> {
        if self.items.len() > values.len() {
            return Ok(false);
        }
        if self.ignore_order {
            let mut candidate_keys = HashSet::with_capacity(values.len());
            for value in values {
                candidate_keys.insert(value_key(value)?);
            }
            for item in &self.items {
                if !candidate_keys.contains(&item.set_key()?) {
                    return Ok(false);
                }
            }
            return Ok(true);
        }
        for (item, value) in self.items.iter().zip(values) {
            if !item.matches_value(value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Infallible form of [`matches_value`](Self::matches_value); panics on
    /// the unordered-hashability misuse.
    pub fn matches(&self, candidate: &Value) -> bool {
        fail_on_misuse(self.matches_value(candidate))
    }

    /// Prefix comparison against another sequence expectation, with this
    /// side's order mode in charge.
    pub(crate) fn flex_eq(&self, other: &SeqPrefix) -> Result<bool, MatchError> {
        if self.items.len() > other.items.len() {
            return Ok(false);
        }
        if self.ignore_order {
            let mut keys = HashSet::with_capacity(other.items.len());
            for item in &other.items {
                keys.insert(item.set_key()?);
            }
            for item in &self.items {
                if !keys.contains(&item.set_key()?) {
                    return Ok(false);
                }
            }
            return Ok(true);
        }
        for (item, value) in self.items.iter().zip(&other.items) {
            if !item.flex_eq(value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl PartialEq for SeqPrefix {
    fn eq(&self, other: &Self) -> bool {
        fail_on_misuse(self.flex_eq(other))
    }
}

impl PartialEq<Value> for SeqPrefix {
    fn eq(&self, other: &Value) -> bool {
        self.matches(other)
    }
}

impl PartialEq<SeqPrefix> for Value {
    fn eq(&self, other: &SeqPrefix) -> bool {
        other.matches(self)
    }
}

impl PartialEq<[Value]> for SeqPrefix {
    fn eq(&self, other: &[Value]) -> bool {
        fail_on_misuse(self.matches_slice(other))
    }
}

impl PartialEq<SeqPrefix> for [Value] {
    fn eq(&self, other: &SeqPrefix) -> bool {
        other == self
    }
}

impl PartialEq<Vec<Value>> for SeqPrefix {
    fn eq(&self, other: &Vec<Value>) -> bool {
        self == other.as_slice()
    }
}

impl PartialEq<SeqPrefix> for Vec<Value> {
    fn eq(&self, other: &SeqPrefix) -> bool {
        other == self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{SubsetMap, ANY};
    use serde_json::json;

    #[test]
    fn test_prefix_tolerates_trailing_elements() {
        let expected = SeqPrefix::new([Expect::from(1i64), Expect::from("foo")]);
        let candidate = json!([1, "foo", true]);

        assert!(expected == candidate);
        assert!(candidate == expected);
        assert!(!(expected != candidate));
    }

    #[test]
    fn test_prefix_mismatch_fails() {
        let expected = SeqPrefix::new([Expect::from(1i64), Expect::from("foo")]);

        assert!(expected != json!([1, true]));
        assert!(expected != json!([1]));
        assert!(expected != json!(["foo", 1]));
    }

    #[test]
    fn test_non_array_candidate_is_not_equal() {
        let expected = SeqPrefix::new([Expect::from(1i64)]);
        assert!(expected != json!({"0": 1}));
        assert!(expected != json!("1"));
        assert!(expected != json!(null));
    }

    #[test]
    fn test_nested_subset_maps() {
        let expected = SeqPrefix::new([
            Expect::from(SubsetMap::new(Vec::<(String, Expect)>::new())),
            Expect::from(SubsetMap::new(Vec::<(String, Expect)>::new())),
        ]);
        assert!(expected == json!([{"a": 1}, {"b": 2}]));
        assert!(expected != json!([{"a": 1}]));
    }

    #[test]
    fn test_unordered_matches_any_order() {
        let expected = SeqPrefix::unordered([Expect::from(true), Expect::from(1i64)]);

        assert!(expected == json!([1, "foo", true]));
        assert!(expected == json!([true, 1]));
        assert!(expected == json!([1, true, 1, true]));
        assert!(expected != json!([1, "foo"]));
    }

    #[test]
    fn test_unordered_requires_enough_elements() {
        // Length is checked before coverage, so duplicates in the
        // expectation still demand a candidate at least as long.
        let expected = SeqPrefix::unordered([Expect::from(1i64), Expect::from(1i64)]);
        assert!(expected != json!([1]));
        assert!(expected == json!([1, 1]));
        assert!(expected == json!([1, 2]));
    }

    #[test]
    fn test_unordered_numeric_collapse() {
        let expected = SeqPrefix::unordered([Expect::from(1i64)]);
        assert!(expected == json!([1.0]));
    }

    #[test]
    #[should_panic(expected = "unhashable")]
    fn test_unordered_with_unhashable_expectation_panics() {
        let expected = SeqPrefix::unordered([Expect::from(SubsetMap::new(
            Vec::<(String, Expect)>::new(),
        ))]);
        let _ = expected == json!([{"a": 1}]);
    }

    #[test]
    #[should_panic(expected = "unhashable")]
    fn test_unordered_with_unhashable_candidate_panics() {
        let expected = SeqPrefix::unordered([Expect::from(1i64)]);
        let _ = expected == json!([1, {"a": 2}]);
    }

    #[test]
    fn test_unordered_unhashable_checked_api_reports_error() {
        let expected = SeqPrefix::unordered([Expect::from(ANY)]);
        let result = expected.matches_value(&json!([1]));
        assert!(matches!(result, Err(MatchError::Unhashable(_))));
    }

    #[test]
    fn test_ordered_with_wildcard_is_fine() {
        let expected = SeqPrefix::new([Expect::from(ANY), Expect::from(2i64)]);
        assert!(expected == json!(["whatever", 2, 3]));
        assert!(expected != json!(["whatever"]));
    }

    #[test]
    fn test_vec_and_slice_operands() {
        let expected = SeqPrefix::new([Expect::from(1i64)]);
        let values = vec![json!(1), json!(2)];

        assert!(expected == values);
        assert!(values == expected);
        assert!(expected == *values.as_slice());
    }

    #[test]
    fn test_seq_against_seq() {
        let smaller = SeqPrefix::new([Expect::from(1i64)]);
        let larger = SeqPrefix::new([Expect::from(1i64), Expect::from(2i64)]);

        assert!(smaller == larger);
        assert!(larger != smaller);
    }
}
