//! Rounded float matcher.

use std::hash::{Hash, Hasher};

use serde_json::Value;

/// A number compared after rounding both sides to a fixed number of decimal
/// digits.
///
/// The stored value is pre-rounded at construction with the same function
/// applied to candidates, so both sides of a comparison always agree on the
/// rounding rule. Numeric candidates in integer or float representation
/// both participate; non-numeric candidates are not equal.
///
/// Matcher-to-matcher equality and hashing use the stored value's bit
/// pattern, which keeps `Eq` lawful even for non-finite inputs, so
/// `RoundFloat` is safe as a set member or map key.
#[derive(Debug, Clone, Copy)]
pub struct RoundFloat {
    value: f64,
    ndigits: u32,
}

impl RoundFloat {
    /// Build a matcher rounding to `ndigits` decimal digits.
    ///
    /// The digit count is unsigned by type, so the classic invalid-input
    /// case (a negative count) is unrepresentable.
    pub fn new(value: f64, ndigits: u32) -> Self {
        RoundFloat {
            value: round_to(value, ndigits),
            ndigits,
        }
    }

    /// The pre-rounded stored value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The digit count candidates are rounded to.
    pub fn ndigits(&self) -> u32 {
        self.ndigits
    }

    /// Match a float candidate, rounding it to the stored digit count.
    pub fn matches_f64(&self, candidate: f64) -> bool {
        round_to(candidate, self.ndigits) == self.value
    }

    /// Match any candidate value; only numbers can match.
    pub fn matches(&self, candidate: &Value) -> bool {
        match candidate {
            Value::Number(number) => match number.as_f64() {
                Some(candidate) => self.matches_f64(candidate),
                None => false,
            },
            _ => false,
        }
    }
}

/// Round to `ndigits` decimal digits.
///
/// Ties round half away from zero (`f64::round`); the same rule is applied
/// to the stored value and to every candidate, so the two sides can never
/// disagree.
pub(crate) fn round_to(value: f64, ndigits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(ndigits.min(308) as i32);
    let scaled = value * factor;
    // Past f64 precision the value is already its own rounding; an
    // overflowed scaling must not collapse distinct values onto infinity.
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

impl PartialEq for RoundFloat {
    fn eq(&self, other: &Self) -> bool {
        self.value.to_bits() == other.value.to_bits()
    }
}

impl Eq for RoundFloat {}

impl Hash for RoundFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.to_bits().hash(state);
    }
}

impl PartialEq<Value> for RoundFloat {
    fn eq(&self, other: &Value) -> bool {
        self.matches(other)
    }
}

impl PartialEq<RoundFloat> for Value {
    fn eq(&self, other: &RoundFloat) -> bool {
        other.matches(self)
    }
}

impl PartialEq<f64> for RoundFloat {
    fn eq(&self, other: &f64) -> bool {
        self.matches_f64(*other)
    }
}

impl PartialEq<RoundFloat> for f64 {
    fn eq(&self, other: &RoundFloat) -> bool {
        other.matches_f64(*self)
    }
}

impl PartialEq<i64> for RoundFloat {
    fn eq(&self, other: &i64) -> bool {
        self.matches_f64(*other as f64)
    }
}

impl PartialEq<RoundFloat> for i64 {
    fn eq(&self, other: &RoundFloat) -> bool {
        other.matches_f64(*self as f64)
    }
}
