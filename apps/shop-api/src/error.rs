//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Shop API                           │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                          │
//! │       │                                                                 │
//! │       ├── DbError::NotFound           → 404 NOT_FOUND                  │
//! │       ├── DbError::InsufficientStock  → 409 INSUFFICIENT_STOCK         │
//! │       ├── CoreError (validation)      → 400 VALIDATION_ERROR           │
//! │       ├── CoreError (business rule)   → 422 BUSINESS_LOGIC             │
//! │       └── any other DbError           → 500 DATABASE_ERROR             │
//! │                                         (detail logged, not returned)   │
//! │                                                                         │
//! │  Response body:                                                        │
//! │  { "code": "NOT_FOUND", "message": "Product not found: ABC-123" }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shop_core::CoreError;
use shop_db::DbError;
use tracing::error;

/// API error returned from handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Not enough stock to fulfil an order (409)
    InsufficientStock,

    /// Business rule rejected the request (422)
    BusinessLogic,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::BusinessLogic => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    fn database(message: &str) -> Self {
        ApiError::new(ErrorCode::DatabaseError, message)
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            DbError::Domain(core) => ApiError::from(core),
            DbError::ConnectionFailed(e) => {
                error!("Database connection failed: {}", e);
                ApiError::database("Database connection failed")
            }
            DbError::PoolExhausted => {
                error!("Database pool exhausted");
                ApiError::database("Database pool exhausted")
            }
            DbError::TransactionFailed(e) => {
                error!("Transaction failed: {}", e);
                ApiError::database("Database transaction failed")
            }
            other => {
                // Log the actual error but return a generic message
                error!("Database operation failed: {}", other);
                ApiError::database("Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidStatusTransition { .. } | CoreError::PriceOverflow => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            _ => ApiError::validation(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}
