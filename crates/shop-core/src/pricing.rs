//! # Order Pricing
//!
//! The order price is the sum of (unit price × quantity) over its lines,
//! computed once when the order is placed.
//!
//! ```text
//! Men Red Shirt   19.99 × 2 = 39.98
//! Blue Jeans      45.00 × 1 = 45.00
//!                            ──────
//! Order price                 84.98
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// A line whose unit price is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: Money,
    pub quantity: i64,
}

impl PricedLine {
    pub fn new(unit_price: Money, quantity: i64) -> Self {
        PricedLine {
            unit_price,
            quantity,
        }
    }

    /// Unit price × quantity, `PriceOverflow` if it does not fit.
    pub fn total(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_mul_quantity(self.quantity)
            .ok_or(CoreError::PriceOverflow)
    }
}

/// Sums line totals with overflow checking.
///
/// ## Example
/// ```rust
/// use shop_core::money::Money;
/// use shop_core::pricing::{order_total, PricedLine};
///
/// let total = order_total(&[
///     PricedLine::new(Money::from_cents(1999), 2),
///     PricedLine::new(Money::from_cents(4500), 1),
/// ])
/// .unwrap();
/// assert_eq!(total.cents(), 8498);
/// ```
pub fn order_total(lines: &[PricedLine]) -> CoreResult<Money> {
    lines.iter().try_fold(Money::zero(), |acc, line| {
        acc.checked_add(line.total()?).ok_or(CoreError::PriceOverflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_order_is_free() {
        assert_eq!(order_total(&[]).unwrap(), Money::zero());
    }

    #[test]
    fn test_total_sums_lines() {
        let lines = [
            PricedLine::new(Money::from_cents(250), 4),
            PricedLine::new(Money::from_cents(0), 7),
            PricedLine::new(Money::from_cents(1999), 1),
        ];
        assert_eq!(order_total(&lines).unwrap().cents(), 2999);
    }

    #[test]
    fn test_line_overflow_is_reported() {
        let lines = [PricedLine::new(Money::from_cents(i64::MAX / 2), 3)];
        assert!(matches!(order_total(&lines), Err(CoreError::PriceOverflow)));
    }

    #[test]
    fn test_sum_overflow_is_reported() {
        let lines = [
            PricedLine::new(Money::from_cents(i64::MAX), 1),
            PricedLine::new(Money::from_cents(1), 1),
        ];
        assert!(matches!(order_total(&lines), Err(CoreError::PriceOverflow)));
    }
}
