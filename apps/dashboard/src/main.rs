//! # Bodega Dashboard
//!
//! Terminal reporting dashboard: fetches the product, sale, and order
//! collections from the database, runs the reporting engine, and renders
//! every panel as a table.
//!
//! ```bash
//! # Seed demo data, then run the dashboard
//! cargo run -p bodega-db --bin seed
//! cargo run -p bodega-dashboard
//!
//! # Against a specific database
//! cargo run -p bodega-dashboard -- --db ./data/bodega.db
//! ```

mod config;
mod error;
mod format;
mod render;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bodega_core::ReportEngine;
use bodega_db::{Database, DbConfig};

use crate::config::DashboardConfig;
use crate::error::AppResult;

/// Retail reporting dashboard for the Bodega backend.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database file path (overrides BODEGA_DB).
    #[arg(long)]
    db: Option<String>,

    /// Low-stock threshold (overrides BODEGA_LOW_STOCK).
    #[arg(long)]
    low_stock: Option<i64>,

    /// How many slow movers to list (overrides BODEGA_SLOW_MOVERS).
    #[arg(long)]
    slow_movers: Option<usize>,

    /// Currency symbol (overrides BODEGA_CURRENCY).
    #[arg(long)]
    currency: Option<String>,
}

#[tokio::main]
async fn main() {
    // Load BODEGA_* settings from a .env file, if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = DashboardConfig::load()?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    if let Some(low_stock) = cli.low_stock {
        config.low_stock_threshold = low_stock;
    }
    if let Some(slow_movers) = cli.slow_movers {
        config.slow_mover_limit = slow_movers;
    }
    if let Some(currency) = cli.currency {
        config.currency = currency;
    }

    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    // Fetch all three collections up front; the engine works on complete
    // in-memory snapshots.
    let products = db.products().list().await?;
    let sales = db.sales().list().await?;
    let orders = db.orders().list().await?;
    let low_stock = db.products().low_stock(config.low_stock_threshold).await?;

    info!(
        products = products.len(),
        sales = sales.len(),
        orders = orders.len(),
        "Collections loaded"
    );

    let engine = ReportEngine::new();
    let now = chrono::Utc::now();
    let mut report = engine.dashboard(&products, &sales, &orders, now);
    if config.slow_mover_limit != bodega_core::analytics::SLOW_MOVER_LIMIT {
        report.slow_movers = engine.slow_movers(&products, &sales, config.slow_mover_limit);
    }

    let currency = &config.currency;

    println!();
    println!("BODEGA — Store Report");
    println!("=====================");
    println!();
    println!("Overview");
    println!("{}", render::kpi_table(&report, currency));
    println!();
    println!("Revenue by category");
    println!("{}", render::revenue_table(&report, currency));
    println!();
    println!("Margin by category");
    println!("{}", render::margin_table(&report, currency));
    println!();
    println!("Top profitable products");
    println!("{}", render::top_products_table(&report, currency));
    println!();
    println!("Slow movers");
    println!("{}", render::slow_movers_table(&report));
    println!();
    println!("Stock by category");
    println!("{}", render::stock_table(&report, currency));
    println!();
    println!("Purchases vs sales (last 12 weeks)");
    println!("{}", render::weekly_table(&report, currency));
    println!();
    println!("Forecast (next 7 days)");
    println!("{}", render::forecast_table(&report, currency));
    println!();
    println!("Low stock (threshold {})", config.low_stock_threshold);
    println!(
        "{}",
        render::low_stock_table(&low_stock, config.low_stock_threshold)
    );

    db.close().await;
    Ok(())
}
