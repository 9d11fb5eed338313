//! # shop-api: HTTP Surface for Shopfront
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shop API Server                                  │
//! │                                                                         │
//! │  Client ───► axum Router ───► handler ───► shop-db store              │
//! │                 │                 │                                     │
//! │            TraceLayer             ▼                                     │
//! │                          CurrencyTable (reads only)                    │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                         JSON body / ApiError                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;

use std::sync::Arc;

use shop_core::CurrencyTable;
use shop_db::Database;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub currencies: Arc<CurrencyTable>,
}

impl AppState {
    /// State with the default currency table.
    pub fn new(db: Database) -> Self {
        AppState {
            db,
            currencies: Arc::new(CurrencyTable::default()),
        }
    }
}
