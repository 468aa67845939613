//! Normalized URL matcher.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::trace;

use crate::error::MatchError;

/// A URL compared without regard to query-parameter order or
/// percent-encoding style.
///
/// Construction parses the URL and normalizes it: the path is
/// percent-decoded (with `+` as space) and the query string becomes an
/// unordered set of decoded key/value pairs, with blank-valued pairs
/// dropped (`?a=&b=2` normalizes like `?b=2`). Scheme, credentials, host,
/// port, and fragment are kept verbatim. Two URLs that differ only in
/// query order or encoding style are equal; any difference in another
/// component is not.
///
/// Relative references are accepted and normalize with an empty scheme and
/// no host, so `Location`-header values like `/container?limit=6` compare
/// against each other (but never against an absolute URL).
///
/// String candidates are coerced through the same normalization; a
/// candidate that does not parse is simply not equal. Normalized equality
/// is a true equivalence relation, so `NormalizedUrl` derives `Hash`/`Eq`
/// and is safe in hashed containers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl {
    parts: UrlParts,
}

/// The normalized component tuple equality and hashing operate on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct UrlParts {
    scheme: String,
    username: String,
    password: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: String,
    query: BTreeSet<(String, String)>,
    fragment: Option<String>,
}

impl NormalizedUrl {
    /// Parse and normalize a URL or relative reference.
    ///
    /// Invalid absolute URLs (bad host, bad port) fail here, at
    /// construction.
    pub fn new(url: &str) -> Result<Self, MatchError> {
        let parsed = match url::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                return Ok(NormalizedUrl::relative(url));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(NormalizedUrl {
            parts: UrlParts {
                scheme: parsed.scheme().to_owned(),
                username: parsed.username().to_owned(),
                password: parsed.password().map(str::to_owned),
                host: parsed.host_str().map(str::to_owned),
                port: parsed.port(),
                path: unquote_plus(parsed.path()),
                query: parse_query(parsed.query().unwrap_or("")),
                fragment: parsed.fragment().map(str::to_owned),
            },
        })
    }

    /// Normalize a scheme-less reference: empty scheme, no authority, the
    /// path/query/fragment split done by hand.
    fn relative(reference: &str) -> Self {
        let (rest, fragment) = match reference.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_owned())),
            None => (reference, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, query),
            None => (rest, ""),
        };
        NormalizedUrl {
            parts: UrlParts {
                scheme: String::new(),
                username: String::new(),
                password: None,
                host: None,
                port: None,
                path: unquote_plus(path),
                query: parse_query(query),
                fragment,
            },
        }
    }

    pub(crate) fn parts(&self) -> &UrlParts {
        &self.parts
    }

    /// Coerce a string candidate through the same normalization and
    /// compare; parse failure is a mismatch, not an error.
    pub fn matches_str(&self, candidate: &str) -> bool {
        match NormalizedUrl::new(candidate) {
            Ok(other) => self.parts == other.parts,
            Err(err) => {
                trace!("candidate does not parse as a url: {err}");
                false
            }
        }
    }

    /// Match any candidate value; only strings can match.
    pub fn matches(&self, candidate: &Value) -> bool {
        match candidate.as_str() {
            Some(text) => self.matches_str(text),
            None => false,
        }
    }
}

/// Decode a query string into its pair set.
///
/// Blank-valued pairs carry no information for an assertion and are
/// dropped, so `?a=&b=2` and `?b=2` normalize identically.
fn parse_query(query: &str) -> BTreeSet<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Percent-decode with `+` as space.
///
/// Decoding that does not yield UTF-8 leaves the input as-is (minus the
/// plus substitution), so comparison degrades to the encoded spelling
/// instead of failing.
fn unquote_plus(segment: &str) -> String {
    let replaced = segment.replace('+', " ");
    match urlencoding::decode(&replaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => replaced,
    }
}

impl PartialEq<Value> for NormalizedUrl {
    fn eq(&self, other: &Value) -> bool {
        self.matches(other)
    }
}

impl PartialEq<NormalizedUrl> for Value {
    fn eq(&self, other: &NormalizedUrl) -> bool {
        other.matches(self)
    }
}

impl PartialEq<str> for NormalizedUrl {
    fn eq(&self, other: &str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<&str> for NormalizedUrl {
    fn eq(&self, other: &&str) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<String> for NormalizedUrl {
    fn eq(&self, other: &String) -> bool {
        self.matches_str(other)
    }
}

impl PartialEq<NormalizedUrl> for str {
    fn eq(&self, other: &NormalizedUrl) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<NormalizedUrl> for &str {
    fn eq(&self, other: &NormalizedUrl) -> bool {
        other.matches_str(self)
    }
}

impl PartialEq<NormalizedUrl> for String {
    fn eq(&self, other: &NormalizedUrl) -> bool {
        other.matches_str(self)
    }
}
