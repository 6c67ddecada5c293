//! # Report Rendering
//!
//! Turns a [`DashboardReport`] into terminal tables, one per reporting
//! panel. Pure presentation: every number is computed upstream by the
//! engine, this module only formats.

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;

use bodega_core::analytics::DashboardReport;
use bodega_core::Product;

use crate::format;

fn table_with_header(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(headers.to_vec());
    table
}

/// Overview KPI cards.
pub fn kpi_table(report: &DashboardReport, currency: &str) -> Table {
    let mut table = table_with_header(&["Metric", "Value"]);

    table.add_row(vec![
        "Total revenue".to_string(),
        format::money(report.total_revenue, currency),
    ]);
    table.add_row(vec![
        "COGS".to_string(),
        format::money(report.inventory.cogs, currency),
    ]);
    table.add_row(vec![
        "Gross gain".to_string(),
        format::money(report.total_gain, currency),
    ]);
    table.add_row(vec![
        "Avg transaction value".to_string(),
        format::money(report.average_transaction_value, currency),
    ]);
    table.add_row(vec![
        "Inventory value".to_string(),
        format::money(report.inventory.inventory_value, currency),
    ]);
    table.add_row(vec![
        "Inventory turnover".to_string(),
        format::ratio(report.inventory.turnover_ratio),
    ]);
    table.add_row(vec![
        "Sales growth (7d vs prior)".to_string(),
        format::pct(report.growth.rate),
    ]);
    table.add_row(vec![
        "Order fulfillment".to_string(),
        format!(
            "{} ({} completed / {} pending)",
            format::pct(report.fulfillment.rate),
            report.fulfillment.completed,
            report.fulfillment.pending
        ),
    ]);
    table.add_row(vec![
        "Most sold product".to_string(),
        report
            .most_sold
            .as_ref()
            .map(|t| format!("{} ({} units)", t.name, t.units_sold))
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Highest sale".to_string(),
        report
            .highest_sale
            .as_ref()
            .map(|h| {
                format!(
                    "{} ({})",
                    format::money(h.total, currency),
                    h.customer.as_deref().unwrap_or("-")
                )
            })
            .unwrap_or_else(|| "-".to_string()),
    ]);

    table
}

/// Revenue per category, best first.
pub fn revenue_table(report: &DashboardReport, currency: &str) -> Table {
    let mut table = table_with_header(&["Category", "Revenue"]);
    for entry in &report.revenue_by_category {
        table.add_row(vec![
            entry.category.clone(),
            format::money(entry.total, currency),
        ]);
    }
    table
}

/// Margin per category, best first.
pub fn margin_table(report: &DashboardReport, currency: &str) -> Table {
    let mut table = table_with_header(&["Category", "Revenue", "Gain", "Margin"]);
    for entry in &report.margin_by_category {
        table.add_row(vec![
            entry.category.clone(),
            format::money(entry.revenue, currency),
            format::money(entry.gain, currency),
            format::pct(entry.margin_pct),
        ]);
    }
    table
}

/// The most profitable products.
pub fn top_products_table(report: &DashboardReport, currency: &str) -> Table {
    let mut table = table_with_header(&["Product", "Gain", "Margin"]);
    for entry in &report.top_profit_products {
        table.add_row(vec![
            entry.name.clone(),
            format::money(entry.gain, currency),
            format::pct(entry.margin_pct),
        ]);
    }
    table
}

/// Slow movers with their current stock.
pub fn slow_movers_table(report: &DashboardReport) -> Table {
    let mut table = table_with_header(&["Product", "Units sold", "Stock"]);
    for entry in &report.slow_movers {
        table.add_row(vec![
            entry.name.clone(),
            entry.units_sold.to_string(),
            entry
                .stock
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

/// Stock position per category with coverage.
pub fn stock_table(report: &DashboardReport, currency: &str) -> Table {
    let mut table = table_with_header(&["Category", "Units", "Value", "Sold/day", "Coverage"]);
    for entry in &report.stock_by_category {
        table.add_row(vec![
            entry.category.clone(),
            entry.stock.to_string(),
            format::money(entry.value, currency),
            format!("{:.2}", entry.avg_daily_units),
            format::days(entry.days_left),
        ]);
    }
    table
}

/// Purchases vs sales over the trailing 12 weeks.
pub fn weekly_table(report: &DashboardReport, currency: &str) -> Table {
    let mut table = table_with_header(&["Week ending", "Sales", "Purchases"]);
    for bucket in &report.weekly_series {
        table.add_row(vec![
            bucket.week_ending.format("%Y-%m-%d").to_string(),
            format::money(bucket.sales, currency),
            format::money(bucket.purchases, currency),
        ]);
    }
    table
}

/// The 7-day flat forecast.
pub fn forecast_table(report: &DashboardReport, currency: &str) -> Table {
    let mut table = table_with_header(&["Day", "Projected revenue"]);
    for day in &report.forecast.forecast {
        table.add_row(vec![
            day.day.format("%Y-%m-%d").to_string(),
            format::money(day.projected, currency),
        ]);
    }
    table
}

/// Products at or below the reorder threshold.
pub fn low_stock_table(products: &[Product], threshold: i64) -> Table {
    let mut table = table_with_header(&["Product", "Category", "Stock", "Threshold"]);
    for product in products {
        table.add_row(vec![
            product.name.clone(),
            product.category.clone(),
            product.stock.to_string(),
            threshold.to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodega_core::ReportEngine;
    use chrono::Utc;

    #[test]
    fn test_rendering_empty_report_does_not_panic() {
        let engine = ReportEngine::new();
        let report = engine.dashboard(&[], &[], &[], Utc::now());

        let kpis = kpi_table(&report, "$").to_string();
        assert!(kpis.contains("Total revenue"));
        assert!(kpis.contains("N/A")); // undefined turnover stays visible

        let weekly = weekly_table(&report, "$").to_string();
        // 12 buckets even with no data.
        assert!(weekly.lines().count() > 12);

        forecast_table(&report, "$");
        revenue_table(&report, "$");
        margin_table(&report, "$");
        slow_movers_table(&report);
        stock_table(&report, "$");
        top_products_table(&report, "$");
        low_stock_table(&[], 10);
    }
}
