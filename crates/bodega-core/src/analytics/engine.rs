//! # Report Engine
//!
//! A stateless calculator deriving retail KPIs from raw product, sale, and
//! purchase-order records.
//!
//! ## Contract
//! Every operation is:
//! - **Pure**: no I/O, no clock reads (`now` is a parameter), no mutation of
//!   inputs.
//! - **Total**: never panics, for any input shape including empty
//!   collections. Non-finite stored numbers are clamped to zero at the
//!   accessor level; dangling product references fall into the
//!   [`UNCATEGORIZED`] / [`UNKNOWN_PRODUCT`] sentinel buckets.
//! - **Deterministic**: identical inputs produce identical outputs. All
//!   grouping goes through ordered maps so tie-breaking never depends on
//!   hash iteration order.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};

use crate::types::{LineProduct, Order, Product, Sale};
use crate::{UNCATEGORIZED, UNKNOWN_PRODUCT};

use super::report::{
    CategoryMargin, CategoryRevenue, CategoryStock, DailyRevenue, DashboardReport, ForecastDay,
    HighestSale, InventoryMetrics, OrderFulfillment, ProductMargin, SalesForecast, SalesGrowth,
    SlowMover, TopSeller, WeeklyBucket,
};

// =============================================================================
// Policy Constants
// =============================================================================

/// How many slow-moving products the report lists.
pub const SLOW_MOVER_LIMIT: usize = 8;

/// Growth rate reported when the previous window had no revenue but the
/// current one does.
///
/// This is a display convention, not a derived value: the true ratio is
/// unbounded, and the reporting screen shows it as "+100%".
pub const GROWTH_CAP_PCT: f64 = 100.0;

/// Width of the growth comparison windows.
const GROWTH_WINDOW_DAYS: i64 = 7;

/// Trailing window for the per-category sales velocity estimate.
const STOCK_WINDOW_DAYS: i64 = 30;

/// Number of buckets in the purchases-vs-sales series.
const WEEKLY_BUCKETS: usize = 12;

/// Moving-average window for the forecast, in days.
const MA_WINDOW: usize = 7;

/// Days projected by the forecast.
const FORECAST_DAYS: i64 = 7;

/// How many entries the "most profitable products" list shows.
const TOP_PROFIT_LIMIT: usize = 5;

// =============================================================================
// Product Index
// =============================================================================

/// Lookup table resolving sale/order lines back to catalog products.
///
/// Resolution order matches how lines are recorded: by catalog id first,
/// then by case-insensitive name. A line that resolves by neither stays
/// unresolved and is reported under the sentinel buckets.
struct ProductIndex<'a> {
    by_id: HashMap<&'a str, &'a Product>,
    by_name: HashMap<String, &'a Product>,
}

impl<'a> ProductIndex<'a> {
    fn build(products: &'a [Product]) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        let mut by_name = HashMap::with_capacity(products.len());
        for product in products {
            by_id.insert(product.id.as_str(), product);
            by_name.insert(product.name.to_lowercase(), product);
        }
        ProductIndex { by_id, by_name }
    }

    /// Resolves a line reference to a catalog product, if possible.
    fn resolve(&self, line: &LineProduct) -> Option<&'a Product> {
        if let Some(id) = line.product_id() {
            if let Some(product) = self.by_id.get(id).copied() {
                return Some(product);
            }
        }
        self.by_name.get(&line.name().to_lowercase()).copied()
    }

    /// The category a line's revenue is reported under.
    fn category_for(&self, line: &LineProduct) -> String {
        match self.resolve(line) {
            Some(product) => category_label(&product.category),
            None => UNCATEGORIZED.to_string(),
        }
    }
}

/// Normalizes a stored category: blank labels collapse into the sentinel.
fn category_label(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Display name for a line: the recorded name, or the catalog name, or the
/// unknown sentinel.
fn line_display_name(index: &ProductIndex<'_>, line: &LineProduct) -> String {
    let recorded = line.name().trim();
    if !recorded.is_empty() {
        return recorded.to_string();
    }
    match index.resolve(line) {
        Some(product) => product.name.clone(),
        None => UNKNOWN_PRODUCT.to_string(),
    }
}

// =============================================================================
// Report Engine
// =============================================================================

/// A stateless calculator for deriving retail metrics from store activity.
#[derive(Debug, Default)]
pub struct ReportEngine {}

impl ReportEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Revenue
    // -------------------------------------------------------------------------

    /// Revenue per category, recomputed from line items, sorted descending.
    ///
    /// Uses `sale_price × quantity` per line (NOT the stored sale total) so
    /// that the per-category split always sums to the per-line revenue even
    /// when the stored total diverges.
    pub fn revenue_by_category(
        &self,
        products: &[Product],
        sales: &[Sale],
    ) -> Vec<CategoryRevenue> {
        let index = ProductIndex::build(products);
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();

        for sale in sales {
            for line in &sale.lines {
                let category = index.category_for(&line.product);
                *totals.entry(category).or_insert(0.0) += line.revenue();
            }
        }

        let mut out: Vec<CategoryRevenue> = totals
            .into_iter()
            .map(|(category, total)| CategoryRevenue { category, total })
            .collect();
        out.sort_by(|a, b| b.total.total_cmp(&a.total));
        out
    }

    // -------------------------------------------------------------------------
    // Inventory
    // -------------------------------------------------------------------------

    /// COGS, inventory value, and the turnover ratio.
    ///
    /// The ratio is `None` when the catalog carries no inventory value:
    /// "not computable" must stay distinct from "no turnover".
    pub fn inventory_metrics(&self, products: &[Product], sales: &[Sale]) -> InventoryMetrics {
        let cogs: f64 = sales.iter().map(Sale::cost_of_goods).sum();
        let inventory_value: f64 = products.iter().map(Product::inventory_value).sum();

        let turnover_ratio = if inventory_value > 0.0 {
            Some(cogs / inventory_value)
        } else {
            None
        };

        InventoryMetrics {
            cogs,
            inventory_value,
            turnover_ratio,
        }
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Mean stored revenue per recorded sale; `0.0` when there are no sales.
    ///
    /// Unlike the turnover ratio, "no sales" is a valid zero-revenue state
    /// for this metric, so the empty case collapses to zero by convention.
    pub fn average_transaction_value(&self, sales: &[Sale]) -> f64 {
        if sales.is_empty() {
            return 0.0;
        }
        let total: f64 = sales.iter().map(Sale::recorded_total).sum();
        total / sales.len() as f64
    }

    // -------------------------------------------------------------------------
    // Slow Movers
    // -------------------------------------------------------------------------

    /// The `limit` products with the fewest units sold, ascending.
    ///
    /// Units are keyed by catalog id, falling back to the lower-cased line
    /// name, then unioned with the full catalog so zero-sale products
    /// appear. Equal quantities keep catalog order (the sort is stable and
    /// catalog entries are inserted first, in order).
    pub fn slow_movers(&self, products: &[Product], sales: &[Sale], limit: usize) -> Vec<SlowMover> {
        let index = ProductIndex::build(products);

        let mut entries: Vec<SlowMover> = Vec::with_capacity(products.len());
        let mut by_key: HashMap<String, usize> = HashMap::with_capacity(products.len());

        for product in products {
            by_key.insert(product.id.clone(), entries.len());
            entries.push(SlowMover {
                key: product.id.clone(),
                name: product.name.clone(),
                units_sold: 0,
                stock: Some(product.stock),
            });
        }

        for sale in sales {
            for line in &sale.lines {
                let key = line.product.grouping_key();
                let idx = match by_key.get(&key) {
                    Some(&idx) => idx,
                    None => {
                        let idx = entries.len();
                        entries.push(SlowMover {
                            key: key.clone(),
                            name: line_display_name(&index, &line.product),
                            units_sold: 0,
                            stock: index.resolve(&line.product).map(|p| p.stock),
                        });
                        by_key.insert(key, idx);
                        idx
                    }
                };
                entries[idx].units_sold += line.quantity;
            }
        }

        entries.sort_by_key(|entry| entry.units_sold);
        entries.truncate(limit);
        entries
    }

    // -------------------------------------------------------------------------
    // Order Fulfillment
    // -------------------------------------------------------------------------

    /// Completed vs pending purchase orders; rate is `0.0` with no orders.
    pub fn order_fulfillment(&self, orders: &[Order]) -> OrderFulfillment {
        let completed = orders.iter().filter(|o| o.is_completed()).count();
        let pending = orders.len() - completed;
        let rate = if orders.is_empty() {
            0.0
        } else {
            100.0 * completed as f64 / orders.len() as f64
        };

        OrderFulfillment {
            completed,
            pending,
            rate,
        }
    }

    // -------------------------------------------------------------------------
    // Sales Growth
    // -------------------------------------------------------------------------

    /// Stored revenue in `[now−7d, now)` against `[now−14d, now−7d)`.
    ///
    /// When the previous window is empty but the current one isn't, the
    /// rate is [`GROWTH_CAP_PCT`]; when both are empty it is `0.0`. The
    /// result is always a finite number.
    pub fn sales_growth(&self, sales: &[Sale], now: DateTime<Utc>) -> SalesGrowth {
        let window = Duration::days(GROWTH_WINDOW_DAYS);
        let current_start = now - window;
        let previous_start = current_start - window;

        let sum_between = |start: DateTime<Utc>, end: DateTime<Utc>| -> f64 {
            sales
                .iter()
                .filter(|s| s.sale_date >= start && s.sale_date < end)
                .map(Sale::recorded_total)
                .sum()
        };

        let current = sum_between(current_start, now);
        let previous = sum_between(previous_start, current_start);

        let rate = if previous > 0.0 {
            100.0 * (current - previous) / previous
        } else if current > 0.0 {
            GROWTH_CAP_PCT
        } else {
            0.0
        };

        SalesGrowth {
            rate,
            current,
            previous,
        }
    }

    // -------------------------------------------------------------------------
    // Margins
    // -------------------------------------------------------------------------

    /// Margin per category, sorted descending by margin percentage.
    ///
    /// Each line is credited a share of its parent sale's stored `gain`
    /// proportional to the line's share of the stored sale total. A sale
    /// with a zero stored total allocates nothing (its lines still count
    /// toward revenue).
    pub fn margin_by_category(&self, products: &[Product], sales: &[Sale]) -> Vec<CategoryMargin> {
        let index = ProductIndex::build(products);
        let mut buckets: BTreeMap<String, (f64, f64)> = BTreeMap::new();

        for sale in sales {
            for line in &sale.lines {
                let category = index.category_for(&line.product);
                let revenue = line.revenue();
                let entry = buckets.entry(category).or_insert((0.0, 0.0));
                entry.0 += revenue;
                entry.1 += allocated_gain(sale, revenue);
            }
        }

        let mut out: Vec<CategoryMargin> = buckets
            .into_iter()
            .map(|(category, (revenue, gain))| CategoryMargin {
                category,
                revenue,
                gain,
                margin_pct: margin_pct(gain, revenue),
            })
            .collect();
        out.sort_by(|a, b| b.margin_pct.total_cmp(&a.margin_pct));
        out
    }

    /// Margin per product, sorted descending by allocated gain.
    pub fn margin_by_product(&self, products: &[Product], sales: &[Sale]) -> Vec<ProductMargin> {
        let index = ProductIndex::build(products);
        let mut buckets: BTreeMap<String, (String, f64, f64)> = BTreeMap::new();

        for sale in sales {
            for line in &sale.lines {
                let key = line.product.grouping_key();
                let revenue = line.revenue();
                let gain = allocated_gain(sale, revenue);
                let entry = buckets
                    .entry(key)
                    .or_insert_with(|| (line_display_name(&index, &line.product), 0.0, 0.0));
                entry.1 += revenue;
                entry.2 += gain;
            }
        }

        let mut out: Vec<ProductMargin> = buckets
            .into_iter()
            .map(|(key, (name, revenue, gain))| ProductMargin {
                key,
                name,
                revenue,
                gain,
                margin_pct: margin_pct(gain, revenue),
            })
            .collect();
        out.sort_by(|a, b| b.gain.total_cmp(&a.gain));
        out
    }

    // -------------------------------------------------------------------------
    // Stock Coverage
    // -------------------------------------------------------------------------

    /// Stock position per category with days-of-stock-remaining, sorted
    /// descending by units on hand.
    ///
    /// Velocity is the trailing-30-day average of units sold per day.
    /// Categories with no recent sales report `days_left: None` - coverage
    /// is unbounded, which must stay distinct from any finite value.
    pub fn stock_by_category(
        &self,
        products: &[Product],
        sales: &[Sale],
        now: DateTime<Utc>,
    ) -> Vec<CategoryStock> {
        let index = ProductIndex::build(products);

        let mut positions: BTreeMap<String, (i64, f64)> = BTreeMap::new();
        for product in products {
            let entry = positions
                .entry(category_label(&product.category))
                .or_insert((0, 0.0));
            entry.0 += product.stock;
            entry.1 += product.inventory_value();
        }

        let window_start = now - Duration::days(STOCK_WINDOW_DAYS);
        let mut recent_units: BTreeMap<String, i64> = BTreeMap::new();
        for sale in sales {
            if sale.sale_date < window_start || sale.sale_date >= now {
                continue;
            }
            for line in &sale.lines {
                let category = index.category_for(&line.product);
                *recent_units.entry(category).or_insert(0) += line.quantity;
            }
        }

        let mut out: Vec<CategoryStock> = positions
            .into_iter()
            .map(|(category, (stock, value))| {
                let units = recent_units.get(&category).copied().unwrap_or(0);
                let avg_daily_units = units as f64 / STOCK_WINDOW_DAYS as f64;
                let days_left = if avg_daily_units > 0.0 {
                    Some(stock as f64 / avg_daily_units)
                } else {
                    None
                };
                CategoryStock {
                    category,
                    stock,
                    value,
                    avg_daily_units,
                    days_left,
                }
            })
            .collect();
        out.sort_by(|a, b| b.stock.cmp(&a.stock));
        out
    }

    // -------------------------------------------------------------------------
    // Weekly Series
    // -------------------------------------------------------------------------

    /// Purchases vs sales over exactly 12 contiguous 7-day buckets ending
    /// at `now`.
    ///
    /// Each record lands in the single bucket whose half-open interval
    /// `[start, end)` contains it; records older than 12 weeks (or dated in
    /// the future) are dropped - only the trailing window is reported.
    pub fn weekly_purchases_vs_sales(
        &self,
        sales: &[Sale],
        orders: &[Order],
        now: DateTime<Utc>,
    ) -> Vec<WeeklyBucket> {
        let week = Duration::days(7);

        let mut buckets: Vec<WeeklyBucket> = (0..WEEKLY_BUCKETS)
            .map(|i| WeeklyBucket {
                week_ending: now - week * (WEEKLY_BUCKETS - 1 - i) as i32,
                sales: 0.0,
                purchases: 0.0,
            })
            .collect();

        for sale in sales {
            if let Some(bucket) = find_bucket(&mut buckets, week, sale.sale_date) {
                bucket.sales += sale.recorded_total();
            }
        }
        for order in orders {
            if let Some(bucket) = find_bucket(&mut buckets, week, order.order_date) {
                bucket.purchases += order.recorded_total();
            }
        }

        buckets
    }

    // -------------------------------------------------------------------------
    // Forecast
    // -------------------------------------------------------------------------

    /// Daily revenue history with a trailing 7-day moving average, plus a
    /// flat 7-day projection.
    ///
    /// Sales are grouped by UTC calendar day of `sale_date`. Early days
    /// average over however many days exist. The projection repeats the
    /// final moving-average value verbatim for the 7 days after `now`;
    /// with no sales at all it is 7 days of zero. Deliberately a naive
    /// baseline - do not swap in a trend extrapolation.
    pub fn sales_forecast(&self, sales: &[Sale], now: DateTime<Utc>) -> SalesForecast {
        let mut daily: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();
        for sale in sales {
            *daily.entry(sale.sale_date.date_naive()).or_insert(0.0) += sale.recorded_total();
        }

        let days: Vec<(chrono::NaiveDate, f64)> = daily.into_iter().collect();
        let mut history = Vec::with_capacity(days.len());
        for (i, &(day, revenue)) in days.iter().enumerate() {
            let from = (i + 1).saturating_sub(MA_WINDOW);
            let window = &days[from..=i];
            let moving_avg =
                window.iter().map(|&(_, r)| r).sum::<f64>() / window.len() as f64;
            history.push(DailyRevenue {
                day,
                revenue,
                moving_avg,
            });
        }

        let last_ma = history.last().map(|d| d.moving_avg).unwrap_or(0.0);
        let forecast = (1..=FORECAST_DAYS)
            .map(|offset| ForecastDay {
                day: (now + Duration::days(offset)).date_naive(),
                projected: last_ma,
            })
            .collect();

        SalesForecast { history, forecast }
    }

    // -------------------------------------------------------------------------
    // Overview KPIs
    // -------------------------------------------------------------------------

    /// The product with the most units sold, if anything sold at all.
    pub fn most_sold_product(&self, products: &[Product], sales: &[Sale]) -> Option<TopSeller> {
        let index = ProductIndex::build(products);
        let mut units: BTreeMap<String, (String, i64)> = BTreeMap::new();

        for sale in sales {
            for line in &sale.lines {
                let key = line.product.grouping_key();
                let entry = units
                    .entry(key)
                    .or_insert_with(|| (line_display_name(&index, &line.product), 0));
                entry.1 += line.quantity;
            }
        }

        let mut best: Option<TopSeller> = None;
        for (key, (name, units_sold)) in units {
            let is_better = best
                .as_ref()
                .map(|b| units_sold > b.units_sold)
                .unwrap_or(true);
            if is_better {
                best = Some(TopSeller {
                    key,
                    name,
                    units_sold,
                });
            }
        }
        best
    }

    /// The largest single sale by stored total.
    pub fn highest_sale(&self, sales: &[Sale]) -> Option<HighestSale> {
        sales
            .iter()
            .max_by(|a, b| a.recorded_total().total_cmp(&b.recorded_total()))
            .map(|sale| HighestSale {
                total: sale.recorded_total(),
                customer: sale.customer.clone(),
            })
    }

    // -------------------------------------------------------------------------
    // Dashboard Bundle
    // -------------------------------------------------------------------------

    /// Computes every reporting-screen metric in one call.
    pub fn dashboard(
        &self,
        products: &[Product],
        sales: &[Sale],
        orders: &[Order],
        now: DateTime<Utc>,
    ) -> DashboardReport {
        let margin_by_product = self.margin_by_product(products, sales);
        let top_profit_products = margin_by_product
            .iter()
            .take(TOP_PROFIT_LIMIT)
            .cloned()
            .collect();

        DashboardReport {
            total_revenue: sales.iter().map(Sale::recorded_total).sum(),
            total_gain: sales.iter().map(Sale::recorded_gain).sum(),
            average_transaction_value: self.average_transaction_value(sales),
            revenue_by_category: self.revenue_by_category(products, sales),
            inventory: self.inventory_metrics(products, sales),
            fulfillment: self.order_fulfillment(orders),
            growth: self.sales_growth(sales, now),
            margin_by_category: self.margin_by_category(products, sales),
            margin_by_product,
            top_profit_products,
            slow_movers: self.slow_movers(products, sales, SLOW_MOVER_LIMIT),
            stock_by_category: self.stock_by_category(products, sales, now),
            weekly_series: self.weekly_purchases_vs_sales(sales, orders, now),
            forecast: self.sales_forecast(sales, now),
            most_sold: self.most_sold_product(products, sales),
            highest_sale: self.highest_sale(sales),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Share of a sale's stored gain credited to a line with the given revenue.
///
/// Zero (or non-positive) stored totals allocate nothing - the division
/// would be undefined and that line simply contributes no gain.
fn allocated_gain(sale: &Sale, line_revenue: f64) -> f64 {
    let total = sale.recorded_total();
    if total > 0.0 {
        line_revenue / total * sale.recorded_gain()
    } else {
        0.0
    }
}

/// `100 × gain / revenue`, collapsing to zero when there is no revenue.
fn margin_pct(gain: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        100.0 * gain / revenue
    } else {
        0.0
    }
}

/// Finds the bucket whose `[start, end)` interval contains `t`.
fn find_bucket(
    buckets: &mut [WeeklyBucket],
    week: Duration,
    t: DateTime<Utc>,
) -> Option<&mut WeeklyBucket> {
    buckets
        .iter_mut()
        .find(|b| t >= b.week_ending - week && t < b.week_ending)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleLine;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap()
    }

    fn product(id: &str, name: &str, category: &str, price: f64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: None,
            description: None,
            category: category.to_string(),
            price,
            stock,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn resolved(product_id: &str, name: &str, quantity: i64, sale_price: f64) -> SaleLine {
        SaleLine {
            product: LineProduct::Resolved {
                product_id: product_id.to_string(),
                name: name.to_string(),
            },
            quantity,
            sale_price,
        }
    }

    fn named(name: &str, quantity: i64, sale_price: f64) -> SaleLine {
        SaleLine {
            product: LineProduct::NamedOnly {
                name: name.to_string(),
            },
            quantity,
            sale_price,
        }
    }

    fn sale(date: DateTime<Utc>, total: f64, gain: f64, lines: Vec<SaleLine>) -> Sale {
        Sale {
            id: format!("s-{}", date.timestamp()),
            customer: None,
            sale_date: date,
            total_amount: total,
            gain,
            lines,
            created_at: date,
        }
    }

    fn order(date: DateTime<Utc>, total: f64, status: crate::OrderStatus) -> Order {
        Order {
            id: format!("o-{}", date.timestamp()),
            supplier: None,
            status,
            order_date: date,
            total_amount: total,
            lines: vec![],
            created_at: date,
        }
    }

    fn days_ago(n: i64) -> DateTime<Utc> {
        now() - Duration::days(n)
    }

    // -------------------------------------------------------------------------
    // Revenue by category
    // -------------------------------------------------------------------------

    #[test]
    fn test_revenue_by_category_basic_scenario() {
        let products = vec![product("1", "Widget", "Tools", 30.0, 10)];
        let sales = vec![sale(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            100.0,
            40.0,
            vec![resolved("1", "Widget", 2, 50.0)],
        )];

        let engine = ReportEngine::new();
        let revenue = engine.revenue_by_category(&products, &sales);
        assert_eq!(revenue.len(), 1);
        assert_eq!(revenue[0].category, "Tools");
        assert_eq!(revenue[0].total, 100.0);
    }

    #[test]
    fn test_revenue_by_category_sums_match_line_revenue() {
        let products = vec![
            product("1", "Arroz", "Granos", 2.5, 100),
            product("2", "Leche", "Lácteos", 1.8, 50),
        ];
        let sales = vec![
            sale(
                days_ago(1),
                17.4,
                5.0,
                vec![resolved("1", "Arroz", 4, 2.6), resolved("2", "Leche", 2, 3.5)],
            ),
            sale(days_ago(2), 9.0, 2.0, vec![named("fantasma", 3, 3.0)]),
        ];

        let engine = ReportEngine::new();
        let revenue = engine.revenue_by_category(&products, &sales);

        let category_sum: f64 = revenue.iter().map(|c| c.total).sum();
        let line_sum: f64 = sales.iter().map(Sale::line_revenue_total).sum();
        assert!((category_sum - line_sum).abs() < 1e-9);

        // Sorted descending by total.
        for pair in revenue.windows(2) {
            assert!(pair[0].total >= pair[1].total);
        }
    }

    #[test]
    fn test_unresolved_lines_fall_into_uncategorized() {
        let products = vec![product("1", "Arroz", "Granos", 2.5, 100)];
        let sales = vec![sale(
            days_ago(1),
            30.0,
            10.0,
            vec![
                // Deleted product: id no longer in catalog, name unknown.
                resolved("gone", "Descontinuado", 1, 10.0),
                // Name-only line that resolves case-insensitively.
                named("ARROZ", 4, 5.0),
            ],
        )];

        let engine = ReportEngine::new();
        let revenue = engine.revenue_by_category(&products, &sales);

        let granos = revenue.iter().find(|c| c.category == "Granos").unwrap();
        assert_eq!(granos.total, 20.0);
        let uncat = revenue.iter().find(|c| c.category == UNCATEGORIZED).unwrap();
        assert_eq!(uncat.total, 10.0);
    }

    #[test]
    fn test_revenue_by_category_empty_sales() {
        let engine = ReportEngine::new();
        let products = vec![product("1", "Arroz", "Granos", 2.5, 100)];
        assert!(engine.revenue_by_category(&products, &[]).is_empty());
    }

    // -------------------------------------------------------------------------
    // Inventory metrics
    // -------------------------------------------------------------------------

    #[test]
    fn test_inventory_turnover_tri_state() {
        let engine = ReportEngine::new();
        let sales = vec![sale(days_ago(1), 100.0, 40.0, vec![])];

        // No inventory: ratio is undefined, not zero.
        let metrics = engine.inventory_metrics(&[], &sales);
        assert_eq!(metrics.cogs, 60.0);
        assert_eq!(metrics.inventory_value, 0.0);
        assert_eq!(metrics.turnover_ratio, None);

        // With inventory: a computed ratio, which may legitimately be zero.
        let products = vec![product("1", "Arroz", "Granos", 2.0, 60)];
        let metrics = engine.inventory_metrics(&products, &sales);
        assert_eq!(metrics.inventory_value, 120.0);
        assert_eq!(metrics.turnover_ratio, Some(0.5));

        let metrics = engine.inventory_metrics(&products, &[]);
        assert_eq!(metrics.turnover_ratio, Some(0.0));
    }

    // -------------------------------------------------------------------------
    // ATV
    // -------------------------------------------------------------------------

    #[test]
    fn test_average_transaction_value() {
        let engine = ReportEngine::new();
        assert_eq!(engine.average_transaction_value(&[]), 0.0);

        let sales = vec![
            sale(days_ago(1), 100.0, 0.0, vec![]),
            sale(days_ago(2), 50.0, 0.0, vec![]),
        ];
        assert_eq!(engine.average_transaction_value(&sales), 75.0);
    }

    // -------------------------------------------------------------------------
    // Slow movers
    // -------------------------------------------------------------------------

    #[test]
    fn test_slow_movers_union_and_ordering() {
        let products = vec![
            product("1", "Arroz", "Granos", 2.5, 100),
            product("2", "Leche", "Lácteos", 1.8, 50),
            product("3", "Pan", "Panadería", 0.75, 30),
        ];
        let sales = vec![sale(
            days_ago(1),
            20.0,
            5.0,
            vec![resolved("2", "Leche", 5, 2.0), named("Fantasma", 1, 10.0)],
        )];

        let engine = ReportEngine::new();
        let movers = engine.slow_movers(&products, &sales, SLOW_MOVER_LIMIT);

        // Union of catalog and sold keys: 3 catalog + 1 name-only.
        assert_eq!(movers.len(), 4);

        // Ascending by units; zero-sale products keep catalog order on ties.
        assert_eq!(movers[0].name, "Arroz");
        assert_eq!(movers[0].units_sold, 0);
        assert_eq!(movers[1].name, "Pan");
        assert_eq!(movers[1].units_sold, 0);
        assert_eq!(movers[2].name, "Fantasma");
        assert_eq!(movers[2].units_sold, 1);
        assert_eq!(movers[2].stock, None);
        assert_eq!(movers[3].name, "Leche");
        assert_eq!(movers[3].units_sold, 5);
        assert_eq!(movers[3].stock, Some(50));
    }

    #[test]
    fn test_slow_movers_respects_limit() {
        let products: Vec<Product> = (0..20)
            .map(|i| product(&format!("p-{i}"), &format!("Producto {i}"), "Granos", 1.0, 10))
            .collect();

        let engine = ReportEngine::new();
        let movers = engine.slow_movers(&products, &[], SLOW_MOVER_LIMIT);
        assert_eq!(movers.len(), SLOW_MOVER_LIMIT);
        for pair in movers.windows(2) {
            assert!(pair[0].units_sold <= pair[1].units_sold);
        }
    }

    // -------------------------------------------------------------------------
    // Order fulfillment
    // -------------------------------------------------------------------------

    #[test]
    fn test_order_fulfillment() {
        let engine = ReportEngine::new();

        let empty = engine.order_fulfillment(&[]);
        assert_eq!(empty.rate, 0.0);
        assert_eq!(empty.completed, 0);
        assert_eq!(empty.pending, 0);

        let orders = vec![
            order(days_ago(1), 100.0, crate::OrderStatus::Completed),
            order(days_ago(2), 100.0, crate::OrderStatus::Completed),
            order(days_ago(3), 100.0, crate::OrderStatus::Pending),
            order(days_ago(4), 100.0, crate::OrderStatus::Pending),
        ];
        let fulfillment = engine.order_fulfillment(&orders);
        assert_eq!(fulfillment.completed, 2);
        assert_eq!(fulfillment.pending, 2);
        assert_eq!(fulfillment.rate, 50.0);
    }

    // -------------------------------------------------------------------------
    // Sales growth
    // -------------------------------------------------------------------------

    #[test]
    fn test_sales_growth_all_denominator_cases() {
        let engine = ReportEngine::new();

        // Both windows empty.
        let growth = engine.sales_growth(&[], now());
        assert_eq!(growth.rate, 0.0);

        // Previous empty, current has revenue: policy cap, not infinity.
        let sales = vec![sale(days_ago(2), 200.0, 0.0, vec![])];
        let growth = engine.sales_growth(&sales, now());
        assert_eq!(growth.rate, GROWTH_CAP_PCT);
        assert_eq!(growth.current, 200.0);
        assert_eq!(growth.previous, 0.0);

        // Both windows populated.
        let sales = vec![
            sale(days_ago(2), 150.0, 0.0, vec![]),
            sale(days_ago(10), 100.0, 0.0, vec![]),
        ];
        let growth = engine.sales_growth(&sales, now());
        assert_eq!(growth.rate, 50.0);

        // Decline.
        let sales = vec![
            sale(days_ago(2), 50.0, 0.0, vec![]),
            sale(days_ago(10), 100.0, 0.0, vec![]),
        ];
        let growth = engine.sales_growth(&sales, now());
        assert_eq!(growth.rate, -50.0);
        assert!(growth.rate.is_finite());
    }

    #[test]
    fn test_sales_growth_window_boundaries() {
        let engine = ReportEngine::new();
        let sales = vec![
            // Exactly on the 7-day boundary: belongs to the current window.
            sale(days_ago(7), 30.0, 0.0, vec![]),
            // Outside both windows.
            sale(days_ago(15), 999.0, 0.0, vec![]),
            // In the future relative to `now`: excluded.
            sale(now() + Duration::hours(1), 999.0, 0.0, vec![]),
        ];
        let growth = engine.sales_growth(&sales, now());
        assert_eq!(growth.current, 30.0);
        assert_eq!(growth.previous, 0.0);
    }

    // -------------------------------------------------------------------------
    // Margins
    // -------------------------------------------------------------------------

    #[test]
    fn test_margin_by_category_basic_scenario() {
        let products = vec![product("1", "Widget", "Tools", 30.0, 10)];
        let sales = vec![sale(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            100.0,
            40.0,
            vec![resolved("1", "Widget", 2, 50.0)],
        )];

        let engine = ReportEngine::new();
        let margins = engine.margin_by_category(&products, &sales);
        assert_eq!(margins.len(), 1);
        assert_eq!(margins[0].category, "Tools");
        assert_eq!(margins[0].revenue, 100.0);
        assert_eq!(margins[0].gain, 40.0);
        assert_eq!(margins[0].margin_pct, 40.0);
    }

    #[test]
    fn test_gain_allocation_is_proportional_to_revenue_share() {
        let products = vec![
            product("1", "Arroz", "Granos", 2.5, 100),
            product("2", "Leche", "Lácteos", 1.8, 50),
        ];
        // One sale, stored total 100, gain 20; Arroz contributes 75 of the
        // line revenue and Leche 25.
        let sales = vec![sale(
            days_ago(1),
            100.0,
            20.0,
            vec![resolved("1", "Arroz", 3, 25.0), resolved("2", "Leche", 1, 25.0)],
        )];

        let engine = ReportEngine::new();
        let margins = engine.margin_by_category(&products, &sales);

        let granos = margins.iter().find(|m| m.category == "Granos").unwrap();
        assert!((granos.gain - 15.0).abs() < 1e-9);
        let lacteos = margins.iter().find(|m| m.category == "Lácteos").unwrap();
        assert!((lacteos.gain - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_sale_allocates_no_gain() {
        let products = vec![product("1", "Arroz", "Granos", 2.5, 100)];
        let sales = vec![sale(
            days_ago(1),
            0.0,
            10.0,
            vec![resolved("1", "Arroz", 2, 25.0)],
        )];

        let engine = ReportEngine::new();
        let margins = engine.margin_by_category(&products, &sales);
        assert_eq!(margins[0].revenue, 50.0);
        assert_eq!(margins[0].gain, 0.0);
        assert_eq!(margins[0].margin_pct, 0.0);
    }

    #[test]
    fn test_margin_by_product_sorted_by_gain() {
        let products = vec![
            product("1", "Arroz", "Granos", 2.5, 100),
            product("2", "Leche", "Lácteos", 1.8, 50),
        ];
        let sales = vec![sale(
            days_ago(1),
            100.0,
            20.0,
            vec![resolved("1", "Arroz", 1, 25.0), resolved("2", "Leche", 3, 25.0)],
        )];

        let engine = ReportEngine::new();
        let margins = engine.margin_by_product(&products, &sales);
        assert_eq!(margins.len(), 2);
        assert_eq!(margins[0].name, "Leche");
        assert!(margins[0].gain > margins[1].gain);
    }

    // -------------------------------------------------------------------------
    // Stock coverage
    // -------------------------------------------------------------------------

    #[test]
    fn test_stock_by_category_days_left() {
        let products = vec![
            product("1", "Arroz", "Granos", 2.0, 60),
            product("2", "Leche", "Lácteos", 1.8, 40),
        ];
        let sales = vec![
            // 30 units of Arroz in the window: 1/day average.
            sale(days_ago(5), 60.0, 0.0, vec![resolved("1", "Arroz", 30, 2.0)]),
            // Outside the 30-day window: ignored.
            sale(days_ago(40), 999.0, 0.0, vec![resolved("1", "Arroz", 500, 2.0)]),
        ];

        let engine = ReportEngine::new();
        let stock = engine.stock_by_category(&products, &sales, now());

        let granos = stock.iter().find(|c| c.category == "Granos").unwrap();
        assert!((granos.avg_daily_units - 1.0).abs() < 1e-9);
        assert_eq!(granos.days_left, Some(60.0));
        assert_eq!(granos.value, 120.0);

        // Nothing sold recently: coverage is unbounded, not a number.
        let lacteos = stock.iter().find(|c| c.category == "Lácteos").unwrap();
        assert_eq!(lacteos.avg_daily_units, 0.0);
        assert_eq!(lacteos.days_left, None);

        // Sorted descending by units on hand.
        assert_eq!(stock[0].category, "Granos");
    }

    // -------------------------------------------------------------------------
    // Weekly series
    // -------------------------------------------------------------------------

    #[test]
    fn test_weekly_series_always_twelve_buckets() {
        let engine = ReportEngine::new();
        let buckets = engine.weekly_purchases_vs_sales(&[], &[], now());
        assert_eq!(buckets.len(), 12);
        for bucket in &buckets {
            assert!(bucket.sales >= 0.0);
            assert!(bucket.purchases >= 0.0);
        }
        // Contiguous, ending at `now`.
        assert_eq!(buckets[11].week_ending, now());
        for pair in buckets.windows(2) {
            assert_eq!(pair[1].week_ending - pair[0].week_ending, Duration::days(7));
        }
    }

    #[test]
    fn test_weekly_series_bucketing_and_truncation() {
        let engine = ReportEngine::new();
        let sales = vec![
            sale(days_ago(3), 100.0, 0.0, vec![]),
            // Older than 12 weeks (84 days): dropped silently.
            sale(days_ago(90), 999.0, 0.0, vec![]),
        ];
        let orders = vec![order(days_ago(80), 250.0, crate::OrderStatus::Pending)];

        let buckets = engine.weekly_purchases_vs_sales(&sales, &orders, now());
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[11].sales, 100.0);
        // 80 days back lands in the oldest bucket (77..84 days ago).
        assert_eq!(buckets[0].purchases, 250.0);

        let total_sales: f64 = buckets.iter().map(|b| b.sales).sum();
        assert_eq!(total_sales, 100.0);
    }

    // -------------------------------------------------------------------------
    // Forecast
    // -------------------------------------------------------------------------

    #[test]
    fn test_forecast_flat_repetition_of_last_moving_average() {
        let sales = vec![
            sale(days_ago(3), 100.0, 0.0, vec![]),
            sale(days_ago(2), 200.0, 0.0, vec![]),
            sale(days_ago(1), 300.0, 0.0, vec![]),
        ];

        let engine = ReportEngine::new();
        let forecast = engine.sales_forecast(&sales, now());

        assert_eq!(forecast.history.len(), 3);
        // Clipped windows at the start of the series.
        assert_eq!(forecast.history[0].moving_avg, 100.0);
        assert_eq!(forecast.history[1].moving_avg, 150.0);
        assert_eq!(forecast.history[2].moving_avg, 200.0);

        assert_eq!(forecast.forecast.len(), 7);
        for day in &forecast.forecast {
            assert_eq!(day.projected, 200.0);
        }
        assert_eq!(forecast.forecast[0].day, (now() + Duration::days(1)).date_naive());
    }

    #[test]
    fn test_forecast_groups_same_day_sales() {
        let day = days_ago(1);
        let sales = vec![
            sale(day, 100.0, 0.0, vec![]),
            sale(day + Duration::hours(2), 50.0, 0.0, vec![]),
        ];

        let engine = ReportEngine::new();
        let forecast = engine.sales_forecast(&sales, now());
        assert_eq!(forecast.history.len(), 1);
        assert_eq!(forecast.history[0].revenue, 150.0);
    }

    #[test]
    fn test_forecast_with_no_sales_is_seven_zeros() {
        let engine = ReportEngine::new();
        let forecast = engine.sales_forecast(&[], now());
        assert!(forecast.history.is_empty());
        assert_eq!(forecast.forecast.len(), 7);
        for day in &forecast.forecast {
            assert_eq!(day.projected, 0.0);
        }
    }

    // -------------------------------------------------------------------------
    // Overview KPIs
    // -------------------------------------------------------------------------

    #[test]
    fn test_most_sold_and_highest_sale() {
        let products = vec![
            product("1", "Arroz", "Granos", 2.5, 100),
            product("2", "Leche", "Lácteos", 1.8, 50),
        ];
        let mut big = sale(
            days_ago(1),
            500.0,
            100.0,
            vec![resolved("1", "Arroz", 2, 250.0)],
        );
        big.customer = Some("María".to_string());
        let small = sale(
            days_ago(2),
            30.0,
            5.0,
            vec![resolved("2", "Leche", 10, 3.0)],
        );
        let sales = vec![big, small];

        let engine = ReportEngine::new();

        let top = engine.most_sold_product(&products, &sales).unwrap();
        assert_eq!(top.name, "Leche");
        assert_eq!(top.units_sold, 10);

        let highest = engine.highest_sale(&sales).unwrap();
        assert_eq!(highest.total, 500.0);
        assert_eq!(highest.customer.as_deref(), Some("María"));

        assert!(engine.most_sold_product(&products, &[]).is_none());
        assert!(engine.highest_sale(&[]).is_none());
    }

    // -------------------------------------------------------------------------
    // Totality & determinism
    // -------------------------------------------------------------------------

    #[test]
    fn test_dashboard_on_empty_collections() {
        let engine = ReportEngine::new();
        let report = engine.dashboard(&[], &[], &[], now());

        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.total_gain, 0.0);
        assert_eq!(report.average_transaction_value, 0.0);
        assert!(report.revenue_by_category.is_empty());
        assert_eq!(report.inventory.turnover_ratio, None);
        assert_eq!(report.fulfillment.rate, 0.0);
        assert_eq!(report.growth.rate, 0.0);
        assert!(report.margin_by_category.is_empty());
        assert!(report.slow_movers.is_empty());
        assert!(report.stock_by_category.is_empty());
        assert_eq!(report.weekly_series.len(), 12);
        assert_eq!(report.forecast.forecast.len(), 7);
        assert!(report.most_sold.is_none());
        assert!(report.highest_sale.is_none());
    }

    #[test]
    fn test_malformed_numbers_degrade_locally() {
        let products = vec![product("1", "Arroz", "Granos", f64::NAN, 10)];
        let sales = vec![sale(
            days_ago(1),
            f64::NAN,
            f64::INFINITY,
            vec![resolved("1", "Arroz", 2, f64::NAN)],
        )];

        let engine = ReportEngine::new();
        let report = engine.dashboard(&products, &sales, &[], now());

        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.total_gain, 0.0);
        assert!(report.growth.rate.is_finite());
        assert_eq!(report.inventory.cogs, 0.0);
        // NaN price means no inventory value, so the ratio is undefined.
        assert_eq!(report.inventory.turnover_ratio, None);
        let granos = report
            .revenue_by_category
            .iter()
            .find(|c| c.category == "Granos")
            .unwrap();
        assert_eq!(granos.total, 0.0);
    }

    #[test]
    fn test_dashboard_is_deterministic_and_does_not_mutate_inputs() {
        let products = vec![
            product("1", "Arroz", "Granos", 2.5, 100),
            product("2", "Leche", "Lácteos", 1.8, 50),
        ];
        let sales = vec![
            sale(
                days_ago(1),
                100.0,
                20.0,
                vec![resolved("1", "Arroz", 3, 25.0), named("Fantasma", 1, 25.0)],
            ),
            sale(days_ago(10), 80.0, 10.0, vec![resolved("2", "Leche", 4, 20.0)]),
        ];
        let orders = vec![order(days_ago(5), 300.0, crate::OrderStatus::Completed)];

        let products_before = products.clone();
        let sales_before = sales.clone();

        let engine = ReportEngine::new();
        let first = engine.dashboard(&products, &sales, &orders, now());
        let second = engine.dashboard(&products, &sales, &orders, now());

        assert_eq!(first, second);
        assert_eq!(products, products_before);
        assert_eq!(sales, sales_before);
    }
}
