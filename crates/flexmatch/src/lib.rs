//! Flexible-equality value matchers for test assertions.
//!
//! This crate provides a small, closed set of wrapper types whose equality
//! operators encode flexible comparison rules instead of strict structural
//! equality: subset maps, prefix sequences, start-anchored patterns,
//! embedded JSON, case-insensitive strings, rounded floats, normalized
//! URLs, and a universal wildcard. They are meant to sit directly inside
//! assertions comparing actual runtime values (HTTP responses, JSON
//! bodies, URLs) against partial expectations:
//!
//! ```
//! use flexmatch::{Expect, Pattern, SubsetMap, ANY};
//! use serde_json::json;
//!
//! let response = json!({
//!     "id": 17,
//!     "name": "user_alpha",
//!     "created_at": "2026-08-27T10:00:00Z",
//! });
//!
//! let expected = SubsetMap::new([
//!     ("id", Expect::from(ANY)),
//!     ("name", Expect::from(Pattern::new("user_").unwrap())),
//! ]);
//!
//! assert_eq!(expected, response);
//! assert_eq!(response, expected);
//! ```
//!
//! # Symmetric equality
//!
//! Every matcher implements `PartialEq` in both operand orders against
//! every candidate type it supports (`serde_json::Value`, `str`/`String`,
//! numbers, bytes where applicable), and `!=` is always the exact negation
//! of `==`. One limitation is inherent to the host language: std
//! collections of foreign types cannot be taught to dispatch flexibly
//! (there is no way to make `HashMap<String, Value> == SubsetMap` compile),
//! so nested flexibility flows through the [`Expect`] tree instead of
//! through std container comparisons.
//!
//! # Hashing
//!
//! Only [`CiStr`], [`RoundFloat`], and [`NormalizedUrl`] implement `Hash`:
//! their equality is a true equivalence relation on a normalized form. The
//! remaining kinds do not implement `Hash` at all, so misuse as a map key
//! is a compile error. The one runtime misuse left - building an
//! *unordered* [`SeqPrefix`] over elements without a canonical hashable
//! form - panics from `==` (or reports [`MatchError::Unhashable`] through
//! the checked `matches_value` methods), because it signals a bug in the
//! expectation, not a legitimate mismatch.
//!
//! # Errors
//!
//! Construction errors (invalid regex, invalid URL) propagate immediately
//! from the constructors. During comparison nothing errors: type
//! mismatches, invalid UTF-8, and invalid JSON all resolve to "not equal".
//!
//! # Module structure
//!
//! - `value` - the [`Expect`] nesting tree and canonical hashing support
//! - `matcher` - one module per wrapper kind
//! - `error` - [`MatchError`]

pub mod error;
pub mod matcher;
pub mod value;

pub use error::MatchError;
pub use matcher::{
    AnyValue, CiStr, JsonText, NormalizedUrl, Pattern, RoundFloat, SeqPrefix, SubsetMap, ANY,
};
pub use value::Expect;
