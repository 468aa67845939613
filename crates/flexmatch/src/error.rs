//! Error types for matcher construction and misuse.

/// Errors raised while building a matcher or misusing one in a hashed context.
///
/// Type mismatches and decode failures observed *during* a comparison are
/// never errors; they resolve to "not equal". Only construction problems
/// (invalid regex, invalid URL, unserializable expectation) and the
/// unordered-sequence hashability misuse surface here.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("expectation is not serializable: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("unhashable value in unordered comparison: {0}")]
    Unhashable(&'static str),
}

/// Resolve a checked comparison inside an infallible `PartialEq` impl.
///
/// `Unhashable` signals a misuse of the matcher (an unordered sequence built
/// over values without a canonical hash), not a legitimate mismatch, so it
/// must not collapse into `false`. `PartialEq::eq` cannot return a `Result`,
/// so the misuse panics; callers who want to handle it use the
/// `matches_value` methods instead.
pub(crate) fn fail_on_misuse(result: Result<bool, MatchError>) -> bool {
    match result {
        Ok(matched) => matched,
        Err(err) => panic!("{err}"),
    }
}
