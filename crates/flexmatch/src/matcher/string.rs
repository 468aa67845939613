//! Case-insensitive string matcher.

use std::borrow::Borrow;

use serde_json::Value;

/// A string compared without regard to case.
///
/// The input is lower-cased once at construction; candidates are
/// lower-cased before comparison. Case-insensitive equality is a true
/// equivalence relation on the normalized form, so this is the one stringly
/// matcher that implements `Hash`/`Eq`/`Ord` and is safe as a map key or
/// set member.
///
/// `Borrow<str>` exposes the normalized form, so a `HashMap<CiStr, V>` can
/// be probed with a plain lower-cased `&str`. The reverse does not hold:
/// std containers keyed by plain `String` hash the candidate verbatim, so a
/// mixed-case member will not be found through a `CiStr` probe. That
/// asymmetry is inherent to cross-type hashing and is left as documented
/// behavior.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CiStr {
    value: String,
}

impl CiStr {
    /// Build a matcher from any string; the stored form is lower-cased.
    pub fn new(value: impl AsRef<str>) -> Self {
        CiStr {
            value: value.as_ref().to_lowercase(),
        }
    }

    /// The normalized (lower-cased) form.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Match a string candidate, folding its case first.
    pub fn matches_str(&self, candidate: &str) -> bool {
        candidate.to_lowercase() == self.value
    }

    /// Match any candidate value; only strings can match.
    pub fn matches(&self, candidate: &Value) -> bool {
        match candidate.as_str() {
            Some(text) => self.matches_str(text),
            None => false,
        }
    }
}

impl Borrow<str> for CiStr {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl PartialEq<Value> for CiStr {
    fn eq(&self, other: &Value) -> bool {
        self.matches(other)
    }
}

impl PartialEq<CiStr> for Value {
    fn eq(&self, other: &CiStr) -> bool {
        other.matches(self)
    }
}

impl PartialEq<str> for CiStr {
    fn eq(&self, other: &str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<&str> for CiStr {
    fn eq(&self, other: &&str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<String> for CiStr {
    fn eq(&self, other: &String) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<CiStr> for str {
    fn eq(&self, other: &CiStr) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<CiStr> for &str {
    fn eq(&self, other: &CiStr) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<CiStr> for String {
    fn eq(&self, other: &CiStr) -> bool {
        other.matches_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::{HashMap, HashSet};
    use std::hash::{Hash, Hasher};
    use serde_json::json;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_case_insensitive_equality() {
        let matcher = CiStr::new("Content-Type");

        assert!(matcher == "content-type");
        assert!(matcher == "CONTENT-TYPE");
        assert!("content-Type" == matcher);
        assert!(matcher != "user-agent");
        assert!(!(matcher != "content-type"));
    }

    #[test]
    fn test_non_string_candidates_are_not_equal() {
        let matcher = CiStr::new("1");

        assert!(matcher != json!(1));
        assert!(json!(1) != matcher);
        assert!(matcher != json!(null));
    }

    #[test]
    fn test_instances_differing_only_in_case_are_identical() {
        let a = CiStr::new("Content-Type");
        let b = CiStr::new("CONTENT-type");

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_usable_as_set_member_and_map_key() {
        let mut set = HashSet::new();
        set.insert(CiStr::new("Content-Type"));
        assert!(set.contains(&CiStr::new("content-TYPE")));
        // Borrow<str> lookup works with the normalized form.
        assert!(set.contains("content-type"));
        assert!(!set.contains("Content-Type"));

        let mut map = HashMap::new();
        map.insert(CiStr::new("X-Request-Id"), 1);
        assert_eq!(map.get("x-request-id"), Some(&1));
    }

    #[test]
    fn test_value_operand() {
        let matcher = CiStr::new("Content-Type");
        assert!(matcher == json!("content-type"));
        assert!(json!("CONTENT-TYPE") == matcher);
    }
}
