//! Exact decimal money amounts.
//!
//! Amounts travel on the wire as IEEE-754 doubles but are accumulated as
//! `rust_decimal::Decimal` so that sums do not drift with the number of
//! records.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// A decimal money amount.
///
/// Arithmetic is exact; rounding only happens when the value is rendered.
///
/// # Examples
///
/// ```
/// use mps7_ledger::Amount;
///
/// let amount = Amount::from_f64(10.5).unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Number of decimal places used when rendering.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Converts a wire double into a decimal amount.
    ///
    /// Uses the shortest decimal that round-trips to the same double, so
    /// `3.7` becomes exactly `3.7`. Returns `None` for NaN, infinities and
    /// magnitudes outside the decimal range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // f64's Display is the shortest round-trip form and never uses an exponent
        Decimal::from_str(&value.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(value))
            .map(Amount)
    }

    /// Sum, or `None` if it falls outside the decimal range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Difference, or `None` if it falls outside the decimal range.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Value rounded to [`Self::DISPLAY_SCALE`] places, half away from zero.
    pub fn rounded(&self) -> Decimal {
        let rounded = self
            .0
            .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        // -0.001 must not render as "-0.00"
        if rounded.is_zero() {
            Decimal::ZERO
        } else {
            rounded
        }
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_uses_shortest_decimal() {
        let a = Amount::from_f64(3.7).unwrap();
        assert_eq!(a, Amount::from_str("3.7").unwrap());

        let b = Amount::from_f64(0.1).unwrap() + Amount::from_f64(0.2).unwrap();
        assert_eq!(b, Amount::from_str("0.3").unwrap());
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(Amount::from_f64(f64::NAN).is_none());
        assert!(Amount::from_f64(f64::INFINITY).is_none());
        assert!(Amount::from_f64(f64::NEG_INFINITY).is_none());
        assert!(Amount::from_f64(1e300).is_none());
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Amount::from_str("1").unwrap().to_string(), "1.00");
        assert_eq!(Amount::from_str("18203.7").unwrap().to_string(), "18203.70");
        assert_eq!(Amount::from_str("2.345").unwrap().to_string(), "2.35");
        assert_eq!(Amount::from_str("-2.345").unwrap().to_string(), "-2.35");
    }

    #[test]
    fn test_tiny_negative_renders_as_zero() {
        assert_eq!(Amount::from_str("-0.001").unwrap().to_string(), "0.00");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let a = Amount::from_str("1.5").unwrap();
        let b = Amount::from_str("2.25").unwrap();

        assert_eq!(a + b, Amount::from_str("3.75").unwrap());
        assert_eq!(a - b, Amount::from_str("-0.75").unwrap());
        assert_eq!(-a, Amount::from_str("-1.5").unwrap());
        assert!((a - a).is_zero());
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let big = Amount::from_f64(5e28).unwrap();

        assert!(big.checked_add(big).is_none());
        assert!((-big).checked_sub(big).is_none());
        assert_eq!(big.checked_sub(big), Some(Amount::ZERO));
        assert_eq!(
            Amount::from_str("1.5").unwrap().checked_add(Amount::from_str("2").unwrap()),
            Some(Amount::from_str("3.5").unwrap())
        );
    }
}
