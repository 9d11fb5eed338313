//! # Domain Types
//!
//! Core domain types used throughout Shopfront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  order_id (FK)  │       │
//! │  │  name, category │   │  name, address  │   │  product_id     │       │
//! │  │  quantity       │   │  phone, status  │   │  quantity       │       │
//! │  │  price_cents    │   │  price_cents    │   │  line_no        │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │ products                              │
//! │                                 ▼                                       │
//! │                        ┌─────────────────┐                              │
//! │                        │ OrderedProduct  │  line resolved against the   │
//! │                        │  (read model)   │  catalog at read time        │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Display category.
    pub category: String,

    /// Units currently in stock. Never negative.
    pub quantity: i64,

    /// Unit price in cents of the base currency.
    pub price_cents: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Fields supplied when creating or fully replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub price_cents: i64,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of an order.
///
/// ## Transitions
/// ```text
///            ┌──────────► Fulfilled
///  Placed ───┤
///            └──────────► Cancelled
/// ```
/// Re-applying the current status is accepted as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Stock reserved, order accepted.
    #[default]
    Placed,
    /// Order shipped to the customer.
    Fulfilled,
    /// Order abandoned.
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Placed,
        OrderStatus::Fulfilled,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Checks the transition table.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Placed, OrderStatus::Fulfilled)
                | (OrderStatus::Placed, OrderStatus::Cancelled)
        ) || *self == next
    }

    /// Returns `next` if the transition is permitted.
    pub fn transition_to(&self, next: OrderStatus) -> CoreResult<OrderStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition {
                from: *self,
                to: next,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL.iter().map(|s| s.to_string()).collect(),
            })
    }
}

// =============================================================================
// Order
// =============================================================================

/// The scalar projection of an order, exactly as stored in `orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    /// Sum of line totals in cents of the base currency.
    pub price_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Scalar fields for a new order row; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub price_cents: i64,
    pub status: OrderStatus,
}

/// An order with its lines resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub price_cents: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Lines in insertion order.
    pub products: Vec<OrderedProduct>,
}

impl Order {
    pub fn from_record(record: OrderRecord, products: Vec<OrderedProduct>) -> Self {
        Order {
            id: record.id,
            name: record.name,
            address: record.address,
            phone: record.phone,
            price_cents: record.price_cents,
            status: record.status,
            created_at: record.created_at,
            products,
        }
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the scalar projection of this order.
    pub fn record(&self) -> OrderRecord {
        OrderRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            price_cents: self.price_cents,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

// =============================================================================
// Order Lines
// =============================================================================

/// A raw association row between an order and a product.
///
/// Only `product_id` and `quantity` are authoritative. The snapshot columns
/// record what the product looked like when the order was placed and are
/// only shown once the product has left the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i64,
    /// Position of the line within its order (0-based).
    pub line_no: i64,
    pub name_snapshot: String,
    pub category_snapshot: String,
    pub unit_price_cents: i64,
}

/// A line to insert for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: String,
    pub quantity: i64,
    pub line_no: i64,
    pub name_snapshot: String,
    pub category_snapshot: String,
    pub unit_price_cents: i64,
}

/// An order line enriched with display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderedProduct {
    pub product_id: String,
    pub name: String,
    pub category: String,
    /// Units of this product in the order.
    pub quantity: i64,
    /// Current unit price (snapshot price if the product was deleted).
    pub price_cents: i64,
    /// False when the product no longer exists and snapshot data is shown.
    pub in_catalog: bool,
}

impl OrderedProduct {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Placement Request
// =============================================================================

/// One requested line of a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// A customer's request to place an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub products: Vec<LineRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Placed);
    }

    #[test]
    fn test_order_status_transitions() {
        let placed = OrderStatus::Placed;
        assert!(placed.can_transition_to(OrderStatus::Fulfilled));
        assert!(placed.can_transition_to(OrderStatus::Cancelled));
        assert!(placed.can_transition_to(OrderStatus::Placed));

        assert!(!OrderStatus::Fulfilled.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Placed));

        let err = OrderStatus::Cancelled
            .transition_to(OrderStatus::Fulfilled)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatusTransition { .. }));
    }

    #[test]
    fn test_order_status_parse() {
        assert_eq!("Fulfilled".parse::<OrderStatus>().unwrap(), OrderStatus::Fulfilled);
        assert_eq!(" cancelled ".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Fulfilled).unwrap();
        assert_eq!(json, "\"fulfilled\"");
    }

    #[test]
    fn test_product_price() {
        let now = Utc::now();
        let product = Product {
            id: "p-1".to_string(),
            name: "Men Red Shirt".to_string(),
            category: "Men Shirts".to_string(),
            quantity: 3,
            price_cents: 1999,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(product.price(), Money::from_cents(1999));
    }
}
