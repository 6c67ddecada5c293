//! Dashboard configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults; command-line flags override both (see `main.rs`).

use std::env;

use serde::{Deserialize, Serialize};

use bodega_core::DEFAULT_LOW_STOCK_THRESHOLD;

/// Dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// SQLite database file path.
    pub database_path: String,

    /// On-hand threshold for the low-stock panel.
    pub low_stock_threshold: i64,

    /// How many slow-moving products to list.
    pub slow_mover_limit: usize,

    /// Currency symbol for money formatting.
    pub currency: String,
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = DashboardConfig {
            database_path: env::var("BODEGA_DB").unwrap_or_else(|_| "./bodega.db".to_string()),

            low_stock_threshold: env::var("BODEGA_LOW_STOCK")
                .unwrap_or_else(|_| DEFAULT_LOW_STOCK_THRESHOLD.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BODEGA_LOW_STOCK".to_string()))?,

            slow_mover_limit: env::var("BODEGA_SLOW_MOVERS")
                .unwrap_or_else(|_| bodega_core::analytics::SLOW_MOVER_LIMIT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("BODEGA_SLOW_MOVERS".to_string()))?,

            currency: env::var("BODEGA_CURRENCY").unwrap_or_else(|_| "$".to_string()),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // The BODEGA_* variables are not set in the test environment.
        let config = DashboardConfig::load().unwrap();
        assert_eq!(config.database_path, "./bodega.db");
        assert_eq!(config.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(config.slow_mover_limit, 8);
        assert_eq!(config.currency, "$");
    }
}
