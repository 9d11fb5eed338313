//! # Currency Presentation
//!
//! Converts prices stored in the base currency into a display currency.
//!
//! ## Conversion Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Read-Time Conversion                                 │
//! │                                                                         │
//! │  products.price_cents (USD, canonical)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CurrencyTable::convert(price, "eur")                                  │
//! │       │                                                                 │
//! │       ├── known code   → price × rate (millionths), rounded            │
//! │       └── unknown code → price unchanged, currency = USD               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Converted { amount: 18.39, currency: EUR }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is persisted: stored prices are always in the base currency.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, RATE_SCALE};

/// A display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Bgn,
}

impl Currency {
    /// The currency every price is stored in.
    pub const BASE: Currency = Currency::Usd;

    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Bgn];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Bgn => "BGN",
        }
    }

    /// Case-insensitive lookup by ISO code.
    pub fn from_code(code: &str) -> Option<Currency> {
        let code = code.trim();
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }

    /// Formats an amount for display, e.g. `EUR 18.39`.
    pub fn format(&self, amount: Money) -> String {
        format!("{} {}", self.code(), amount)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of a display conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Converted {
    pub amount: Money,
    pub currency: Currency,
}

impl Converted {
    pub fn display(&self) -> String {
        self.currency.format(self.amount)
    }
}

/// Fixed multipliers from the base currency to each display currency.
///
/// ## Rates
/// Stored in millionths: `920_000` means 1 USD = 0.92 EUR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyTable {
    rates: HashMap<Currency, i64>,
}

impl CurrencyTable {
    /// A table containing only the base currency.
    pub fn base_only() -> Self {
        let mut rates = HashMap::new();
        rates.insert(Currency::BASE, RATE_SCALE);
        CurrencyTable { rates }
    }

    /// Sets (or replaces) the rate for a currency.
    ///
    /// The base currency always converts at 1.0 and cannot be overridden.
    pub fn with_rate(mut self, currency: Currency, rate_micros: i64) -> Self {
        if currency != Currency::BASE {
            self.rates.insert(currency, rate_micros);
        }
        self
    }

    /// Returns the configured rate in millionths.
    pub fn rate(&self, currency: Currency) -> Option<i64> {
        self.rates.get(&currency).copied()
    }

    /// Resolves a requested code, falling back to the base currency when
    /// the code is missing, unknown, or has no configured rate.
    pub fn resolve(&self, code: Option<&str>) -> Currency {
        code.and_then(Currency::from_code)
            .filter(|c| self.rates.contains_key(c))
            .unwrap_or(Currency::BASE)
    }

    /// Converts a base-currency amount into the requested display currency.
    ///
    /// ## Example
    /// ```rust
    /// use shop_core::currency::{Currency, CurrencyTable};
    /// use shop_core::money::Money;
    ///
    /// let table = CurrencyTable::default();
    /// let shown = table.convert(Money::from_cents(1999), "XYZ").unwrap();
    /// assert_eq!(shown.currency, Currency::Usd);
    /// assert_eq!(shown.amount.cents(), 1999);
    /// ```
    pub fn convert(&self, amount: Money, code: &str) -> CoreResult<Converted> {
        self.convert_to(amount, self.resolve(Some(code)))
    }

    /// Converts into an already-resolved currency.
    ///
    /// ## Errors
    /// `PriceOverflow` when the converted amount does not fit in i64.
    pub fn convert_to(&self, amount: Money, currency: Currency) -> CoreResult<Converted> {
        match self.rate(currency) {
            Some(rate) if currency != Currency::BASE => Ok(Converted {
                amount: amount
                    .checked_apply_rate(rate)
                    .ok_or(CoreError::PriceOverflow)?,
                currency,
            }),
            _ => Ok(Converted {
                amount,
                currency: Currency::BASE,
            }),
        }
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        CurrencyTable::base_only()
            .with_rate(Currency::Eur, 920_000)
            .with_rate(Currency::Gbp, 790_000)
            .with_rate(Currency::Bgn, 1_800_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_lookup_is_case_insensitive() {
        assert_eq!(Currency::from_code("eur"), Some(Currency::Eur));
        assert_eq!(Currency::from_code(" Gbp "), Some(Currency::Gbp));
        assert_eq!(Currency::from_code("XYZ"), None);
        assert_eq!(Currency::from_code(""), None);
    }

    #[test]
    fn test_convert_known_currency() {
        let table = CurrencyTable::default();
        let shown = table.convert(Money::from_cents(1999), "EUR").unwrap();
        assert_eq!(shown.currency, Currency::Eur);
        assert_eq!(shown.amount.cents(), 1839);
        assert_eq!(shown.display(), "EUR 18.39");

        let shown = table.convert(Money::from_cents(1000), "bgn").unwrap();
        assert_eq!(shown.amount.cents(), 1800);
    }

    #[test]
    fn test_base_currency_is_identity() {
        let table = CurrencyTable::default();
        let shown = table.convert(Money::from_cents(1234), "usd").unwrap();
        assert_eq!(shown.currency, Currency::Usd);
        assert_eq!(shown.amount.cents(), 1234);
    }

    #[test]
    fn test_unknown_code_falls_back_to_base() {
        let table = CurrencyTable::default();
        let shown = table.convert(Money::from_cents(1234), "JPY").unwrap();
        assert_eq!(shown.currency, Currency::BASE);
        assert_eq!(shown.amount.cents(), 1234);
        assert_eq!(table.resolve(None), Currency::BASE);
    }

    #[test]
    fn test_currency_without_rate_falls_back_to_base() {
        let table = CurrencyTable::base_only().with_rate(Currency::Eur, 900_000);
        let shown = table.convert(Money::from_cents(1000), "GBP").unwrap();
        assert_eq!(shown.currency, Currency::Usd);
        assert_eq!(shown.amount.cents(), 1000);
    }

    #[test]
    fn test_conversion_overflow_is_an_error() {
        let table = CurrencyTable::default();
        let huge = Money::from_cents(6_000_000_000_000_000_000);

        assert!(matches!(
            table.convert(huge, "BGN"),
            Err(CoreError::PriceOverflow)
        ));
        // The base currency never scales, so it cannot overflow
        assert_eq!(table.convert(huge, "USD").unwrap().amount, huge);
    }

    #[test]
    fn test_largest_valid_price_converts_at_every_rate() {
        let table = CurrencyTable::default();
        let line_max = Money::from_cents(crate::MAX_PRICE_CENTS)
            .checked_mul_quantity(crate::MAX_LINE_QUANTITY)
            .unwrap();

        for currency in Currency::ALL {
            assert!(table.convert_to(line_max, currency).is_ok());
        }
    }

    #[test]
    fn test_base_rate_cannot_be_overridden() {
        let table = CurrencyTable::default().with_rate(Currency::Usd, 2 * RATE_SCALE);
        assert_eq!(table.rate(Currency::Usd), Some(RATE_SCALE));
    }
}
