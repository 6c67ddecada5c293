//! # App Error Type
//!
//! Unified error type for the dashboard binary.
//!
//! ## Error Handling Strategy
//! Layer errors (`ConfigError`, `DbError`) are wrapped, never stringified,
//! so the exit path can still match on what went wrong. The analytics
//! engine has no error type - it is total - so nothing from bodega-core's
//! reporting side appears here.

use thiserror::Error;

use crate::config::ConfigError;
use bodega_db::DbError;

/// Errors surfaced to the operator by the dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

/// Result type for dashboard operations.
pub type AppResult<T> = Result<T, AppError>;
