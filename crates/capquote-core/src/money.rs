//! # Money Module
//!
//! Provides the `Money` type for final quote amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Factor pricing multiplies a perimeter by a tiered factor:             │
//! │    50.5 × 1.15 = 58.074999999999996  (f64)                              │
//! │    toFixed(2) → "58.07"  ❌ should be 58.08                              │
//! │                                                                         │
//! │  OUR SOLUTION: decimal factors, integer cents                          │
//! │    50.5 × 1.15 = 58.075 (exact decimal)                                 │
//! │    × 100 → 5807.5 → round half away from zero → 5808 cents             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Factors stay in [`Decimal`]; anything that is a price lives in `Money`.
//!
//! ## Usage
//! ```rust
//! use capquote_core::money::Money;
//!
//! let price = Money::from_cents(20000); // $200.00
//! let total = price.checked_add(Money::from_cents(8500)).unwrap();
//! assert_eq!(total.to_string(), "$285.00");
//! ```

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Decimal Helpers
// =============================================================================

/// Rounds a decimal half away from zero, the way quote sheets round.
///
/// ```rust
/// use capquote_core::money::round_half_up;
/// use rust_decimal::Decimal;
///
/// let v = Decimal::new(58075, 3); // 58.075
/// assert_eq!(round_half_up(v, 2), Decimal::new(5808, 2));
/// ```
pub fn round_half_up(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a request or table number into a decimal.
///
/// Returns `None` for NaN, infinities, and values outside decimal range.
/// Uses the shortest round-tripping representation, so `0.1_f64` becomes
/// exactly `0.1`.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: an over-discounted intermediate stays representable
/// - **Checked arithmetic only**: table and request values are unbounded, so
///   every operation reports overflow instead of panicking
/// - **Tuple struct**: zero-cost over i64, serializes as the bare cent count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole dollars.
    ///
    /// ```rust
    /// use capquote_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(85).cents(), 8500);
    /// ```
    #[inline]
    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars * 100)
    }

    /// Converts a decimal dollar amount to cents, rounding half away from zero.
    ///
    /// Returns `None` if the amount does not fit in i64 cents.
    ///
    /// ```rust
    /// use capquote_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::from_decimal(Decimal::new(58075, 3)).unwrap(); // 58.075
    /// assert_eq!(m.cents(), 5808);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let cents = amount.checked_mul(Decimal::ONE_HUNDRED)?;
        round_half_up(cents, 0).to_i64().map(Money)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Exact two-decimal dollar amount (the output boundary representation).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Multiplies by a tier multiplier and rounds back to whole cents.
    ///
    /// ```rust
    /// use capquote_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let base = Money::from_cents(41999); // $419.99
    /// let tiered = base.apply_multiplier(Decimal::new(115, 2)).unwrap(); // ×1.15
    /// // 482.9885 → 482.99
    /// assert_eq!(tiered.cents(), 48299);
    /// ```
    pub fn apply_multiplier(&self, multiplier: Decimal) -> Option<Money> {
        let product = self.to_decimal().checked_mul(multiplier)?;
        Money::from_decimal(round_half_up(product, 2))
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies by a count (per-unit surcharges), `None` on overflow.
    ///
    /// ```rust
    /// use capquote_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(45).checked_mul_quantity(2), Some(Money::from_dollars(90)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(10.005)).unwrap().cents(), 1001);
        assert_eq!(Money::from_decimal(dec!(10.004)).unwrap().cents(), 1000);
        assert_eq!(Money::from_decimal(dec!(-10.005)).unwrap().cents(), -1001);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(37500).to_string(), "$375.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
    }

    #[test]
    fn test_to_decimal_is_exact() {
        let m = Money::from_cents(5807);
        assert_eq!(m.to_decimal(), dec!(58.07));
        assert_eq!(m.to_decimal() * dec!(100), dec!(5807));
    }

    #[test]
    fn test_apply_multiplier() {
        let base = Money::from_dollars(300);
        assert_eq!(base.apply_multiplier(dec!(0.85)).unwrap().cents(), 25500);
        assert_eq!(base.apply_multiplier(Decimal::ONE).unwrap(), base);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_dollars(200);
        let b = Money::from_dollars(45);
        let sum = b.checked_mul_quantity(2).and_then(|holes| a.checked_add(holes));
        assert_eq!(sum.map(|m| m.cents()), Some(29000));
        assert_eq!(b.checked_mul_quantity(3).unwrap().cents(), 13500);
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(max.checked_mul_quantity(2), None);
        assert_eq!(Money::from_dollars(85).checked_mul_quantity(0), Some(Money::zero()));
    }

    #[test]
    fn test_decimal_from_f64() {
        assert_eq!(decimal_from_f64(0.1), Some(dec!(0.1)));
        assert_eq!(decimal_from_f64(30.0), Some(dec!(30)));
        assert_eq!(decimal_from_f64(f64::NAN), None);
        assert_eq!(decimal_from_f64(f64::INFINITY), None);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(dec!(1.23455), 4), dec!(1.2346));
        assert_eq!(round_half_up(dec!(1.125), 2), dec!(1.13));
    }
}
