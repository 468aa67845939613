//! Anchored pattern matcher.

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::error::MatchError;

/// A regex expectation anchored at the start of the candidate.
///
/// Equal to any string whose beginning matches the pattern; the match does
/// not have to consume the whole string (`a.*` matches `"abc"`, `"a"`, but
/// not `"xa"`). This start-only anchoring is deliberate, long-standing
/// behavior; callers wanting a full match end their pattern with `$`.
///
/// Non-string candidates are rendered to their JSON text (`null`, `true`,
/// `1.5`, ...) before matching; byte candidates are UTF-8 decoded, and
/// invalid UTF-8 fails the match instead of raising. Patterns compile in
/// the `regex` crate's default Unicode mode, so `\w` and friends match
/// non-ASCII word characters.
///
/// Pattern equality is not an equivalence relation over candidates, so
/// `Pattern` does not implement `Hash`.
#[derive(Debug, Clone)]
pub struct Pattern {
    pattern: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a start-anchored pattern.
    ///
    /// Invalid patterns fail here, at construction, never at comparison
    /// time.
    pub fn new(pattern: &str) -> Result<Self, MatchError> {
        let regex = Regex::new(&format!(r"\A(?:{pattern})"))?;
        Ok(Pattern {
            pattern: pattern.to_owned(),
            regex,
        })
    }

    /// The pattern source, without the anchoring wrapper.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Match a string candidate.
    pub fn matches_str(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Match a byte candidate; invalid UTF-8 is a mismatch, not an error.
    pub fn matches_bytes(&self, candidate: &[u8]) -> bool {
        match std::str::from_utf8(candidate) {
            Ok(text) => self.matches_str(text),
            Err(err) => {
                trace!("byte candidate is not valid utf-8: {err}");
                false
            }
        }
    }

    /// Match any candidate value; non-strings are rendered to JSON text
    /// first.
    pub fn matches(&self, candidate: &Value) -> bool {
        match candidate {
            Value::String(text) => self.matches_str(text),
            other => self.matches_str(&other.to_string()),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl PartialEq<Value> for Pattern {
    fn eq(&self, other: &Value) -> bool {
        self.matches(other)
    }
}

impl PartialEq<Pattern> for Value {
    fn eq(&self, other: &Pattern) -> bool {
        other.matches(self)
    }
}

impl PartialEq<str> for Pattern {
    fn eq(&self, other: &str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<&str> for Pattern {
    fn eq(&self, other: &&str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<String> for Pattern {
    fn eq(&self, other: &String) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<Pattern> for str {
    fn eq(&self, other: &Pattern) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<Pattern> for &str {
    fn eq(&self, other: &Pattern) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<Pattern> for String {
    fn eq(&self, other: &Pattern) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<[u8]> for Pattern {
    fn eq(&self, other: &[u8]) -> bool {
        self.matches_bytes(other)
    }
}

impl PartialEq<Pattern> for [u8] {
    fn eq(&self, other: &Pattern) -> bool {
        other.matches_bytes(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anchored_at_start_not_full_match() {
        let pattern = Pattern::new("a.*").unwrap();

        assert!(pattern == "abc");
        assert!(pattern == "a");
        assert!(pattern != "xa");
        assert!("abc" == pattern);
        assert!(!("abc" != pattern));
    }

    #[test]
    fn test_partial_consumption() {
        let pattern = Pattern::new("first").unwrap();

        assert!(pattern == "first class");
        assert!(pattern != "a first class");
    }

    #[test]
    fn test_non_string_candidates_are_stringified() {
        let pattern = Pattern::new(r"\d+").unwrap();
        assert!(pattern == json!(123));
        assert!(json!(123) == pattern);

        let null_pattern = Pattern::new("null").unwrap();
        assert!(null_pattern == json!(null));

        let bool_pattern = Pattern::new("tr.*").unwrap();
        assert!(bool_pattern == json!(true));
        assert!(bool_pattern != json!(false));
    }

    #[test]
    fn test_byte_candidates() {
        let pattern = Pattern::new("caf.*").unwrap();

        assert!(pattern.matches_bytes("caf\u{e9}".as_bytes()));
        assert!(pattern == b"cafe"[..]);
        // Truncated multi-byte sequence: invalid UTF-8 fails the match.
        assert!(pattern != b"caf\xc3"[..]);
    }

    #[test]
    fn test_unicode_word_characters() {
        let pattern = Pattern::new(r"\w+").unwrap();
        assert!(pattern == "\u{43f}\u{440}\u{438}\u{432}\u{435}\u{442}");
    }

    #[test]
    fn test_alternation_stays_anchored() {
        // The anchoring wrapper must not let a trailing alternative escape
        // the start anchor.
        let pattern = Pattern::new("foo|bar").unwrap();
        assert!(pattern == "bar");
        assert!(pattern != "xbar");
    }

    #[test]
    fn test_invalid_pattern_fails_at_construction() {
        assert!(matches!(
            Pattern::new("[invalid("),
            Err(MatchError::Pattern(_))
        ));
    }

    #[test]
    fn test_pattern_to_pattern_compares_source() {
        let a = Pattern::new("a.*").unwrap();
        let b = Pattern::new("a.*").unwrap();
        let c = Pattern::new("b.*").unwrap();

        assert!(a == b);
        assert!(a != c);
    }

    #[test]
    fn test_nested_in_sequence() {
        use crate::matcher::SeqPrefix;
        use crate::value::Expect;

        let pattern = || Expect::from(Pattern::new("first.*").unwrap());
        let expected = SeqPrefix::new([pattern(), pattern(), pattern()]);

        assert!(expected == json!(["first class", "first bus", "first time"]));
        assert!(expected != json!([1, 2, "first class"]));
    }
}
