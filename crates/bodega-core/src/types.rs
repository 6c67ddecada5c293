//! # Domain Types
//!
//! Core domain types used throughout Bodega.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name, category │   │  total_amount   │   │  total_amount   │       │
//! │  │  price, stock   │   │  gain           │   │  supplier       │       │
//! │  │  sku (optional) │   │  lines[]        │   │  status, lines[]│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   LineProduct   │   │    SaleLine     │   │   OrderStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Resolved{id}   │   │  quantity       │   │  Pending        │       │
//! │  │  NamedOnly{name}│   │  sale_price     │   │  Completed      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored vs Recomputed Totals
//! A `Sale` carries `total_amount` and `gain` exactly as recorded at entry
//! time, and its lines carry the realized per-unit prices. The two views can
//! legitimately diverge (discounts applied at the register, edited lines).
//! Both are exposed as separate accessors - `recorded_total()` and
//! `line_revenue_total()` - and are never silently reconciled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Clamps a stored numeric field to a finite value.
///
/// Records fetched from the hosted store may carry missing or garbage
/// numerics; one bad field must degrade that record locally, never abort a
/// whole report.
#[inline]
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the store catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the catalog and on receipts.
    pub name: String,

    /// Stock Keeping Unit - optional business identifier.
    pub sku: Option<String>,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Category used by the reporting screens ("Granos", "Lácteos", ...).
    pub category: String,

    /// Current unit list price.
    pub price: f64,

    /// Current on-hand quantity (non-negative).
    pub stock: i64,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Value of the on-hand stock at the current list price.
    #[inline]
    pub fn inventory_value(&self) -> f64 {
        self.stock as f64 * finite_or_zero(self.price)
    }

    /// Whether on-hand stock is at or below the given threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.stock <= threshold
    }
}

// =============================================================================
// Line Product Reference
// =============================================================================

/// How a sale or order line refers to a product.
///
/// ## Why a sum type?
/// Lines recorded against the live catalog carry a `product_id`; lines typed
/// free-hand (or whose product was later deleted) only carry a display name.
/// Making the two cases explicit keeps resolution logic exhaustive instead
/// of relying on an optional id being present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum LineProduct {
    /// Line references a catalog product by id. The name is a snapshot of
    /// the product name at entry time.
    Resolved { product_id: String, name: String },

    /// Line only carries the display name typed at entry time.
    NamedOnly { name: String },
}

impl LineProduct {
    /// The display name recorded on the line.
    pub fn name(&self) -> &str {
        match self {
            LineProduct::Resolved { name, .. } => name,
            LineProduct::NamedOnly { name } => name,
        }
    }

    /// The referenced catalog id, if the line carries one.
    pub fn product_id(&self) -> Option<&str> {
        match self {
            LineProduct::Resolved { product_id, .. } => Some(product_id),
            LineProduct::NamedOnly { .. } => None,
        }
    }

    /// Grouping key: catalog id when present, lower-cased name otherwise.
    ///
    /// Name-only lines for the same product merge case-insensitively, but
    /// are NOT folded into the id-keyed bucket; the two reference styles
    /// stay distinct groups, matching how sales were recorded.
    pub fn grouping_key(&self) -> String {
        match self {
            LineProduct::Resolved { product_id, .. } => product_id.clone(),
            LineProduct::NamedOnly { name } => name.to_lowercase(),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A line item in a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    /// The product this line refers to.
    pub product: LineProduct,

    /// Units sold (positive).
    pub quantity: i64,

    /// Realized per-unit sale price (may differ from the catalog price).
    pub sale_price: f64,
}

impl SaleLine {
    /// Revenue contributed by this line: `sale_price × quantity`.
    #[inline]
    pub fn revenue(&self) -> f64 {
        finite_or_zero(self.sale_price) * self.quantity as f64
    }
}

/// A recorded sale transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// Customer name, when captured at the register.
    pub customer: Option<String>,

    /// When the sale happened.
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,

    /// Total charged, as recorded at entry time.
    pub total_amount: f64,

    /// Total profit (revenue minus cost), as recorded at entry time.
    /// Never recomputed by the reporting engine.
    pub gain: f64,

    /// The sold line items.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub lines: Vec<SaleLine>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// The stored total, clamped finite.
    #[inline]
    pub fn recorded_total(&self) -> f64 {
        finite_or_zero(self.total_amount)
    }

    /// The stored gain, clamped finite.
    #[inline]
    pub fn recorded_gain(&self) -> f64 {
        finite_or_zero(self.gain)
    }

    /// Cost of goods sold for this sale, approximated as `total - gain`.
    #[inline]
    pub fn cost_of_goods(&self) -> f64 {
        self.recorded_total() - self.recorded_gain()
    }

    /// Total recomputed from the line items.
    ///
    /// May diverge from [`Sale::recorded_total`]; callers pick the view they
    /// need, nothing reconciles the two.
    pub fn line_revenue_total(&self) -> f64 {
        self.lines.iter().map(SaleLine::revenue).sum()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed with the supplier but not yet received.
    Pending,
    /// Order has been received in full.
    Completed,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A line item in a purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    /// The product this line refers to.
    pub product: LineProduct,

    /// Units ordered (positive).
    pub quantity: i64,

    /// Agreed per-unit cost from the supplier.
    pub unit_cost: f64,
}

impl OrderLine {
    /// Cost contributed by this line: `unit_cost × quantity`.
    #[inline]
    pub fn cost(&self) -> f64 {
        finite_or_zero(self.unit_cost) * self.quantity as f64
    }
}

/// A purchase order placed with a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,

    /// Supplier name, when captured.
    pub supplier: Option<String>,

    pub status: OrderStatus,

    /// When the order was placed.
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,

    /// Total cost, as recorded at entry time.
    pub total_amount: f64,

    /// The ordered line items.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub lines: Vec<OrderLine>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// The stored total, clamped finite.
    #[inline]
    pub fn recorded_total(&self) -> f64 {
        finite_or_zero(self.total_amount)
    }

    /// Total recomputed from the line items.
    pub fn line_cost_total(&self) -> f64 {
        self.lines.iter().map(OrderLine::cost).sum()
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

// =============================================================================
// Creation Inputs
// =============================================================================

/// Input for creating a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub stock: i64,
}

/// Input for recording a sale together with its lines.
///
/// `total_amount` and `gain` are computed by the entry form (total minus the
/// catalog cost of the sold units) and stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub customer: Option<String>,
    /// Defaults to the insertion time when absent.
    #[ts(as = "Option<String>")]
    pub sale_date: Option<DateTime<Utc>>,
    pub total_amount: f64,
    pub gain: f64,
    pub lines: Vec<SaleLine>,
}

/// Input for recording a purchase order together with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub supplier: Option<String>,
    /// Defaults to the insertion time when absent.
    #[ts(as = "Option<String>")]
    pub order_date: Option<DateTime<Utc>>,
    pub total_amount: f64,
    pub lines: Vec<OrderLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================
