//! # Report Types
//!
//! Immutable view-model values produced by the [`ReportEngine`]. Each type
//! maps to one card, table, or chart on the reporting screens.
//!
//! ## `Option` for "not computable"
//! Two metrics are rates with an undefined-denominator case and must not
//! collapse to zero: the inventory turnover ratio (no inventory value) and
//! days-of-stock-remaining (no recent sales). Both use `Option<f64>` where
//! `None` means "not computable" / "unbounded", distinct from any finite
//! value. Every other ratio collapses cleanly to `0.0`.
//!
//! [`ReportEngine`]: super::engine::ReportEngine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Per-Category / Per-Product Aggregates
// =============================================================================

/// Revenue accumulated per category, sorted descending by total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryRevenue {
    pub category: String,
    pub total: f64,
}

/// Inventory cost metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventoryMetrics {
    /// Cost of goods sold: `Σ (total_amount − gain)` over all sales.
    pub cogs: f64,

    /// Current inventory value: `Σ stock × price` over the catalog.
    pub inventory_value: f64,

    /// `cogs / inventory_value`; `None` when there is no inventory value
    /// (the ratio is undefined, not zero).
    pub turnover_ratio: Option<f64>,
}

/// A product with low sales velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SlowMover {
    /// Grouping key: catalog id, or lower-cased name for name-only lines.
    pub key: String,
    pub name: String,
    /// Units sold across all sales (0 for products that never sold).
    pub units_sold: i64,
    /// Current stock, when the key resolves to a catalog product.
    pub stock: Option<i64>,
}

/// Completed vs pending purchase orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderFulfillment {
    pub completed: usize,
    pub pending: usize,
    /// `100 × completed / total`, `0.0` when there are no orders.
    pub rate: f64,
}

/// Week-over-week revenue growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesGrowth {
    /// Percentage change; capped at the policy constant when the previous
    /// window had no revenue. Always finite.
    pub rate: f64,
    /// Revenue in `[now−7d, now)`.
    pub current: f64,
    /// Revenue in `[now−14d, now−7d)`.
    pub previous: f64,
}

/// Margin aggregated per category, sorted descending by margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryMargin {
    pub category: String,
    /// Revenue recomputed from the lines in this category.
    pub revenue: f64,
    /// Gain allocated to this category proportional to revenue share.
    pub gain: f64,
    /// `100 × gain / revenue`, `0.0` when revenue is zero.
    pub margin_pct: f64,
}

/// Margin aggregated per product, sorted descending by gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductMargin {
    pub key: String,
    pub name: String,
    pub revenue: f64,
    pub gain: f64,
    pub margin_pct: f64,
}

/// Stock position per category with estimated coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryStock {
    pub category: String,
    /// Units on hand across the category.
    pub stock: i64,
    /// Value of those units at current list prices.
    pub value: f64,
    /// Average units sold per day over the trailing 30 days.
    pub avg_daily_units: f64,
    /// `stock / avg_daily_units`; `None` when nothing sold recently
    /// (coverage is unbounded, not a large number).
    pub days_left: Option<f64>,
}

// =============================================================================
// Time Series
// =============================================================================

/// One 7-day bucket of the purchases-vs-sales series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeeklyBucket {
    /// Exclusive end of the bucket's half-open interval; used as the label.
    #[ts(as = "String")]
    pub week_ending: DateTime<Utc>,
    /// Sale revenue recorded inside the bucket.
    pub sales: f64,
    /// Purchase-order spend recorded inside the bucket.
    pub purchases: f64,
}

/// One day of revenue history with its trailing moving average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyRevenue {
    #[ts(as = "String")]
    pub day: NaiveDate,
    pub revenue: f64,
    /// Trailing 7-day simple moving average (window clipped at the start of
    /// the series).
    pub moving_avg: f64,
}

/// One projected day of the flat forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ForecastDay {
    #[ts(as = "String")]
    pub day: NaiveDate,
    pub projected: f64,
}

/// Daily revenue history plus a naive 7-day projection.
///
/// The projection repeats the final moving-average value verbatim. That flat
/// repetition is the documented contract of this baseline forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesForecast {
    pub history: Vec<DailyRevenue>,
    pub forecast: Vec<ForecastDay>,
}

// =============================================================================
// Overview KPIs
// =============================================================================

/// The best-selling product by units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopSeller {
    pub key: String,
    pub name: String,
    pub units_sold: i64,
}

/// The largest single sale on record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HighestSale {
    pub total: f64,
    pub customer: Option<String>,
}

// =============================================================================
// Dashboard Bundle
// =============================================================================

/// Everything the reporting screen renders, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardReport {
    /// `Σ total_amount` over all sales (stored totals).
    pub total_revenue: f64,
    /// `Σ gain` over all sales (stored gains).
    pub total_gain: f64,
    /// Average transaction value; `0.0` when there are no sales.
    pub average_transaction_value: f64,

    pub revenue_by_category: Vec<CategoryRevenue>,
    pub inventory: InventoryMetrics,
    pub fulfillment: OrderFulfillment,
    pub growth: SalesGrowth,
    pub margin_by_category: Vec<CategoryMargin>,
    pub margin_by_product: Vec<ProductMargin>,
    /// First entries of `margin_by_product` (highest gain first).
    pub top_profit_products: Vec<ProductMargin>,
    pub slow_movers: Vec<SlowMover>,
    pub stock_by_category: Vec<CategoryStock>,
    /// Exactly 12 contiguous 7-day buckets ending at `now`.
    pub weekly_series: Vec<WeeklyBucket>,
    pub forecast: SalesForecast,

    pub most_sold: Option<TopSeller>,
    pub highest_sale: Option<HighestSale>,
}
