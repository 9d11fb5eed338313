//! # shop-core: Pure Business Logic for Shopfront
//!
//! This crate holds the domain of the shop: products, orders, order lines,
//! money, currency presentation and order pricing. It has zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    shop-api (axum)                              │   │
//! │  │    GET /product, POST /order, PUT /order/{id}, ...              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shop-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ currency  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ Currency  │  │   rules   │  │   │
//! │  │   │   Order   │  │           │  │   Table   │  │  pricing  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    shop-db (Database Layer)                     │   │
//! │  │        SQLite stores, migrations, order placement               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, OrderLine, OrderStatus)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`currency`] - Display currency conversion
//! - [`pricing`] - Order total computation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use shop_core::currency::CurrencyTable;
//! use shop_core::money::Money;
//!
//! let price = Money::from_cents(1000); // $10.00 in the base currency
//! let table = CurrencyTable::default();
//!
//! let shown = table.convert(price, "eur").unwrap();
//! assert_eq!(shown.currency.code(), "EUR");
//! assert_eq!(shown.amount.cents(), 920);
//! ```

pub mod currency;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

pub use currency::{Converted, Currency, CurrencyTable};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Maximum number of lines in a single order.
///
/// ## Business Reason
/// Prevents runaway requests and keeps the placement transaction short.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity of a single product in one order line.
pub const MAX_LINE_QUANTITY: i64 = 10_000;

/// Maximum unit price in cents (10 billion in major units).
///
/// A full order at this price (`MAX_ORDER_LINES` lines of
/// `MAX_LINE_QUANTITY` units) still fits in i64 after conversion at any
/// rate up to 4.0.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000_000;

/// Largest order total reachable within the line and price limits.
pub const MAX_ORDER_TOTAL_CENTS: i64 =
    MAX_PRICE_CENTS * MAX_LINE_QUANTITY * MAX_ORDER_LINES as i64;
