//! # Validation Module
//!
//! Input validation for catalog writes and order placement.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP (shop-api)                                              │
//! │  └── Type validation (JSON deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: Business rule validation                        │
//! │  ├── names and categories present and bounded                          │
//! │  ├── stock never negative, prices within [0, MAX_PRICE_CENTS]          │
//! │  └── order lines present, positive, bounded                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  └── Foreign key from lines to orders                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shop_core::validation::{validate_line_quantity, validate_product_name};
//!
//! validate_product_name("Men Red Shirt").unwrap();
//! validate_line_quantity(2).unwrap();
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{NewProduct, PlaceOrderRequest};
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES, MAX_ORDER_TOTAL_CENTS, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use shop_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Men Red Shirt").is_ok());
/// assert!(validate_product_name("  ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates a product category (non-empty, at most 100 characters).
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_text("category", category, MAX_CATEGORY_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock level. Zero is allowed (sold out).
pub fn validate_stock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Zero is allowed (free items)
/// - Must not exceed MAX_PRICE_CENTS
///
/// ## Example
/// ```rust
/// use shop_core::validation::validate_price;
/// use shop_core::MAX_PRICE_CENTS;
///
/// assert!(validate_price(1999).is_ok());
/// assert!(validate_price(0).is_ok());
/// assert!(validate_price(-1).is_err());
/// assert!(validate_price(MAX_PRICE_CENTS + 1).is_err());
/// ```
pub fn validate_price(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price_cents".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::TooLarge {
            field: "price_cents".to_string(),
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a stored order total in cents.
pub fn validate_order_total(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price_cents".to_string(),
        });
    }

    if cents > MAX_ORDER_TOTAL_CENTS {
        return Err(ValidationError::TooLarge {
            field: "price_cents".to_string(),
            max: MAX_ORDER_TOTAL_CENTS,
        });
    }

    Ok(())
}

/// Validates the quantity of one order line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_line_quantity(quantity: i64) -> CoreResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Aggregate Validators
// =============================================================================

/// Validates every field of a product write.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_category(&product.category)?;
    validate_stock_quantity(product.quantity)?;
    validate_price(product.price_cents)?;
    Ok(())
}

/// Validates an order placement request before any stock is touched.
///
/// ## Rules
/// - At least one line, at most MAX_ORDER_LINES
/// - Every line has a product id and a valid quantity
///
/// Customer contact fields are free-form and may be empty.
pub fn validate_place_order(request: &PlaceOrderRequest) -> CoreResult<()> {
    if request.products.is_empty() {
        return Err(CoreError::EmptyOrder);
    }

    if request.products.len() > MAX_ORDER_LINES {
        return Err(CoreError::TooManyLines {
            max: MAX_ORDER_LINES,
        });
    }

    for line in &request.products {
        if line.product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product id".to_string(),
            }
            .into());
        }
        validate_line_quantity(line.quantity)?;
    }

    Ok(())
}
