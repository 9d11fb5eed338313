//! # Error Types
//!
//! Domain-specific error types for shop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shop-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shop-db errors (separate crate)                                       │
//! │  └── DbError          - NotFound, InsufficientStock, store failures    │
//! │                                                                         │
//! │  shop-api errors (app)                                                 │
//! │  └── ApiError         - What HTTP clients see (status + JSON body)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent requests the domain refuses before any storage work is
/// attempted (or, for transitions, after reading the current state).
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order was submitted without any lines.
    #[error("Order must contain at least one product")]
    EmptyOrder,

    /// Order has more lines than allowed.
    #[error("Order cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A total or a currency conversion overflowed the money representation.
    #[error("Price overflows the supported range")]
    PriceOverflow,

    /// Order status change not permitted by the transition table.
    ///
    /// ## When This Occurs
    /// - Fulfilling a cancelled order
    /// - Cancelling an order that was already fulfilled
    #[error("Order cannot move from {from} to {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value exceeds its upper bound.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: i64 },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 20_000,
            max: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 20000 exceeds maximum allowed (10000)"
        );

        let err = CoreError::InvalidStatusTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Fulfilled,
        };
        assert_eq!(err.to_string(), "Order cannot move from cancelled to fulfilled");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustNotBeNegative {
            field: "price_cents".to_string(),
        };
        assert_eq!(err.to_string(), "price_cents must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "category".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
