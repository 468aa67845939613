//! The matcher kinds.
//!
//! Each kind lives in its own module and redefines equality against
//! candidate values:
//!
//! - `any` - wildcard, equal to everything
//! - `map` - subset map (case-sensitive and case-insensitive keys)
//! - `seq` - prefix sequence (ordered and unordered)
//! - `pattern` - regex anchored at the start of the candidate
//! - `json` - embedded JSON text
//! - `string` - case-insensitive string, hashable
//! - `float` - rounded float, hashable
//! - `url` - normalized URL, hashable

mod any;
mod float;
mod json;
mod map;
mod pattern;
mod seq;
mod string;
pub(crate) mod url;

pub use any::{AnyValue, ANY};
pub use float::RoundFloat;
pub use json::JsonText;
pub use map::SubsetMap;
pub use pattern::Pattern;
pub use seq::SeqPrefix;
pub use string::CiStr;
pub use self::url::NormalizedUrl;
