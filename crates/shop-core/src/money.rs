//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    19.99 * 3 = 59.970000000000006  ❌ WRONG!                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1999 cents * 3 = 5997 cents      ✅ exact                            │
//! │                                                                         │
//! │  Order totals are sums of (unit price × quantity), so every stored      │
//! │  price and every computed total is an exact integer.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shop_core::money::Money;
//!
//! let price = Money::from_cents(1999); // 19.99
//! let line_total = price * 3;          // 59.97
//! assert_eq!(line_total.cents(), 5997);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul};

/// Millionths in one whole unit of an exchange rate.
pub const RATE_SCALE: i64 = 1_000_000;

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Arithmetic stays simple; non-negativity of stored
///   prices is a validation rule, not a type rule
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use shop_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    ///
    /// ## Example
    /// ```rust
    /// use shop_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).major(), 10);
    /// assert_eq!(Money::from_cents(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use shop_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Applies an exchange rate expressed in millionths (`1_000_000` = 1.0),
    /// returning `None` when the result does not fit in i64.
    ///
    /// ## Implementation
    /// Integer math in i128: `(cents * rate + 500_000) / 1_000_000`.
    /// The `+500_000` rounds half away from zero for positive amounts.
    ///
    /// ## Example
    /// ```rust
    /// use shop_core::money::Money;
    ///
    /// // 19.99 at 0.92 = 18.3908 → 18.39
    /// assert_eq!(
    ///     Money::from_cents(1999).checked_apply_rate(920_000),
    ///     Some(Money::from_cents(1839))
    /// );
    /// assert_eq!(Money::from_cents(i64::MAX).checked_apply_rate(1_800_000), None);
    /// ```
    pub fn checked_apply_rate(&self, rate_micros: i64) -> Option<Money> {
        let half = (RATE_SCALE / 2) as i128;
        let scaled = self.0 as i128 * rate_micros as i128;
        let rounded = if scaled >= 0 {
            (scaled + half) / RATE_SCALE as i128
        } else {
            (scaled - half) / RATE_SCALE as i128
        };
        i64::try_from(rounded).ok().map(Money::from_cents)
    }
}

/// Plain decimal rendering without a currency symbol, e.g. `10.99`.
///
/// ## Note
/// Currency-aware formatting lives in [`crate::currency::Currency::format`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(7)), "0.07");
        assert_eq!(format!("{}", Money::zero()), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a * 3).cents(), 3000);

        let mut total = Money::zero();
        total += a;
        total += b;
        assert_eq!(total.cents(), 1500);
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let big = Money::from_cents(i64::MAX);
        assert!(big.checked_add(Money::from_cents(1)).is_none());
        assert!(big.checked_mul_quantity(2).is_none());
        assert_eq!(
            Money::from_cents(250).checked_add(Money::from_cents(50)),
            Some(Money::from_cents(300))
        );
    }

    #[test]
    fn test_apply_rate_identity_and_rounding() {
        let price = Money::from_cents(1999);
        assert_eq!(price.checked_apply_rate(RATE_SCALE), Some(price));

        // 1.00 at 0.125 = 0.125 → 0.13 (half rounds up)
        assert_eq!(Money::from_cents(100).checked_apply_rate(125_000), Some(Money::from_cents(13)));
        // 1.00 at 0.124 = 0.124 → 0.12
        assert_eq!(Money::from_cents(100).checked_apply_rate(124_000), Some(Money::from_cents(12)));
    }

    #[test]
    fn test_apply_rate_handles_large_amounts() {
        let large = Money::from_cents(9_000_000_000_000);
        assert_eq!(
            large.checked_apply_rate(2 * RATE_SCALE),
            Some(Money::from_cents(18_000_000_000_000))
        );
    }

    #[test]
    fn test_apply_rate_rejects_results_outside_i64() {
        // 6e18 at 1.8 used to wrap to a negative amount
        let huge = Money::from_cents(6_000_000_000_000_000_000);
        assert_eq!(huge.checked_apply_rate(1_800_000), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_apply_rate(2 * RATE_SCALE), None);

        // Shrinking rates still fit
        assert!(huge.checked_apply_rate(500_000).is_some());
    }
}
