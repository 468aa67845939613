//! Wildcard matcher, equal to every candidate.

use serde_json::Value;

/// A value equal to anything: null, numbers, strings, containers, other
/// matchers. Inside a container expectation it still consumes exactly one
/// position, so absence does not match.
///
/// `AnyValue` deliberately does not implement `Hash`: its equality collapses
/// onto all values and cannot back a hash bucket, so use in a hashed
/// container is rejected at compile time.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyValue;

/// The wildcard instance.
pub const ANY: AnyValue = AnyValue;

impl<T: ?Sized> PartialEq<T> for AnyValue {
    fn eq(&self, _other: &T) -> bool {
        true
    }
}

macro_rules! eq_any {
    ($($candidate:ty),* $(,)?) => {
        $(
            impl PartialEq<AnyValue> for $candidate {
                fn eq(&self, _other: &AnyValue) -> bool {
                    true
                }
            }
        )*
    };
}

eq_any!(Value, str, &str, String, bool, i64, u64, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_any_equals_everything() {
        assert!(ANY == 1i64);
        assert!(1i64 == ANY);
        assert!(ANY == "foo");
        assert!("foo" == ANY);
        assert!(ANY == json!(null));
        assert!(json!({"a": 1, "b": "foo"}) == ANY);
        assert!(json!([1, 2, 3, "b"]) == ANY);
        assert!(ANY == AnyValue);
        assert!(ANY == None::<i32>);
    }

    #[test]
    fn test_any_never_unequal() {
        assert!(!(ANY != 1i64));
        assert!(!(json!("x") != ANY));
    }
}
