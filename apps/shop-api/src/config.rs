//! Shop API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Shop API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Maximum number of pooled database connections
    pub db_max_connections: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_port: 8080,
            database_path: "./data/shop.db".to_string(),
            db_max_connections: 5,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                  | Default          |
    /// |---------------------------|------------------|
    /// | `SHOP_HTTP_PORT`          | `8080`           |
    /// | `SHOP_DATABASE_PATH`      | `./data/shop.db` |
    /// | `SHOP_DB_MAX_CONNECTIONS` | `5`              |
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            http_port: parse_or(&lookup, "SHOP_HTTP_PORT", defaults.http_port)?,

            database_path: lookup("SHOP_DATABASE_PATH")
                .filter(|path| !path.trim().is_empty())
                .unwrap_or(defaults.database_path),

            db_max_connections: parse_or(
                &lookup,
                "SHOP_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "SHOP_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
