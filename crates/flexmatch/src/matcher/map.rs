//! Subset map matcher.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::error::{fail_on_misuse, MatchError};
use crate::value::Expect;

/// A map expectation that tolerates extra keys in the candidate.
///
/// Equal to any JSON object that carries every declared key with a value
/// matching the declared expectation; keys the matcher does not declare are
/// ignored. Declared values are [`Expect`] trees, so wrappers nest:
///
/// ```
/// use flexmatch::{Expect, SubsetMap, ANY};
/// use serde_json::json;
///
/// let expected = SubsetMap::new([("a", Expect::from(1i64)), ("b", Expect::from(ANY))]);
/// assert!(expected == json!({"a": 1, "b": "anything", "c": true}));
/// assert!(json!({"a": 1, "b": "anything", "c": true}) == expected);
/// ```
///
/// Built with [`case_insensitive`](Self::case_insensitive), declared keys
/// are lower-cased at construction and candidate keys are lower-cased before
/// lookup.
///
/// Subset equality is not an equivalence relation, so `SubsetMap` does not
/// implement `Hash`.
#[derive(Debug, Clone)]
pub struct SubsetMap {
    entries: BTreeMap<String, Expect>,
    ci_keys: bool,
}

impl SubsetMap {
    /// Build a subset map with case-sensitive keys.
    pub fn new<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Expect>,
    {
        SubsetMap {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            ci_keys: false,
        }
    }

    /// Build a subset map whose keys compare case-insensitively.
    pub fn case_insensitive<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Expect>,
    {
        SubsetMap {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into().to_lowercase(), value.into()))
                .collect(),
            ci_keys: true,
        }
    }

    /// Whether candidate keys are lower-cased before lookup.
    pub fn is_case_insensitive(&self) -> bool {
        self.ci_keys
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no keys are declared (such a map matches any object).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the subset constraint against a candidate value.
    ///
    /// Non-object candidates are simply not equal.
    pub fn matches_value(&self, candidate: &Value) -> Result<bool, MatchError> {
        match candidate.as_object() {
            Some(object) => self.matches_object(object),
            None => Ok(false),
        }
    }

    /// Check the subset constraint against a candidate object.
    pub fn matches_object(&self, object: &Map<String, Value>) -> Result<bool, MatchError> {
        if self.ci_keys {
            let folded: HashMap<String, &Value> = object
                .iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect();
            for (key, expected) in &self.entries {
                let value = match folded.get(key) {
                    Some(value) => *value,
                    None => return Ok(false),
                };
                if !expected.matches_value(value)? {
                    return Ok(false);
                }
            }
        } else {
            for (key, expected) in &self.entries {
                let value = match object.get(key) {
                    Some(value) => value,
                    None => return Ok(false),
                };
                if !expected.matches_value(value)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Infallible form of [`matches_value`](Self::matches_value).
    pub fn matches(&self, candidate: &Value) -> bool {
        fail_on_misuse(self.matches_value(candidate))
    }

    /// Subset comparison against another subset map: every key declared here
    /// must be declared there with a flexibly-equal value.
    pub(crate) fn flex_eq(&self, other: &SubsetMap) -> Result<bool, MatchError> {
        let folded: HashMap<String, &Expect> = other
            .entries
            .iter()
            .map(|(key, value)| {
                let key = if self.ci_keys {
                    key.to_lowercase()
                } else {
                    key.clone()
                };
                (key, value)
            })
            .collect();
        for (key, expected) in &self.entries {
            let value = match folded.get(key) {
                Some(value) => *value,
                None => return Ok(false),
            };
            if !expected.flex_eq(value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl PartialEq for SubsetMap {
    fn eq(&self, other: &Self) -> bool {
        fail_on_misuse(self.flex_eq(other))
    }
}

impl PartialEq<Value> for SubsetMap {
    fn eq(&self, other: &Value) -> bool {
        self.matches(other)
    }
}

impl PartialEq<SubsetMap> for Value {
    fn eq(&self, other: &SubsetMap) -> bool {
        other.matches(self)
    }
}

impl PartialEq<Map<String, Value>> for SubsetMap {
    fn eq(&self, other: &Map<String, Value>) -> bool {
        fail_on_misuse(self.matches_object(other))
    }
}

impl PartialEq<SubsetMap> for Map<String, Value> {
    fn eq(&self, other: &SubsetMap) -> bool {
        other == self
    }
}
