//! # Analytics Module
//!
//! The reporting engine: derived KPIs and chart-ready series computed from
//! raw product / sale / purchase-order collections.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Reporting Data Flow                                │
//! │                                                                         │
//! │  bodega-db repositories                                                │
//! │       │  (async fetch, outside this crate)                             │
//! │       ▼                                                                 │
//! │  Vec<Product>  Vec<Sale>  Vec<Order>                                   │
//! │       │            │          │                                         │
//! │       └────────────┼──────────┘                                        │
//! │                    ▼                                                    │
//! │          ReportEngine (pure, synchronous)                              │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │          DashboardReport (immutable view models)                       │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │          Presentation (terminal tables / JS dashboard)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine owns no state between invocations and performs no I/O; all
//! time-windowed computations take `now` as an explicit argument so results
//! are deterministic given identical inputs.

pub mod engine;
pub mod report;

pub use engine::{ReportEngine, GROWTH_CAP_PCT, SLOW_MOVER_LIMIT};
pub use report::{
    CategoryMargin, CategoryRevenue, CategoryStock, DailyRevenue, DashboardReport, ForecastDay,
    HighestSale, InventoryMetrics, OrderFulfillment, ProductMargin, SalesForecast, SalesGrowth,
    SlowMover, TopSeller, WeeklyBucket,
};
