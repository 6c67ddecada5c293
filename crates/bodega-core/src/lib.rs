//! # bodega-core: Pure Business Logic for Bodega
//!
//! This crate is the **heart** of Bodega, a small-business retail management
//! backend. It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bodega Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Dashboard (apps/dashboard)                     │   │
//! │  │    KPI cards ──► category tables ──► weekly series ──► forecast │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bodega-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐                 │   │
//! │  │   │   types   │  │ validation│  │ analytics  │                 │   │
//! │  │   │  Product  │  │   rules   │  │ReportEngine│                 │   │
//! │  │   │ Sale/Order│  │  checks   │  │  reports   │                 │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bodega-db (Database Layer)                     │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Order, etc.)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`analytics`] - The reporting engine (derived KPIs from raw records)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Total Computation**: the analytics engine never panics, whatever the
//!    input shape - malformed numbers degrade locally to zero, dangling
//!    product references degrade to sentinel buckets
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bodega_core::Product` instead of
// `use bodega_core::types::Product`

pub use analytics::{DashboardReport, ReportEngine};
pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Grouping bucket used when a sale or order line cannot be resolved to a
/// catalog product (or the resolved product has an empty category).
///
/// ## Why a sentinel?
/// Products can be hard-deleted while historical sales still reference them.
/// Reports must keep counting that revenue somewhere instead of erroring.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Display name used when neither the line nor the catalog can name a product.
pub const UNKNOWN_PRODUCT: &str = "Unknown";

/// Maximum line items allowed in a single sale or purchase order.
///
/// ## Business Reason
/// Prevents runaway entry forms and ensures reasonable transaction sizes.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Default on-hand threshold below which a product is flagged as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;
