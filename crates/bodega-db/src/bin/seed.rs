//! # Seed Data Generator
//!
//! Populates the database with demo data for development: the store catalog,
//! ten weeks of sales history, and a batch of purchase orders, so every
//! panel of the reporting dashboard has something to show.
//!
//! ## Usage
//! ```bash
//! # Seed the default database (./bodega.db)
//! cargo run -p bodega-db --bin seed
//!
//! # Specify database path
//! cargo run -p bodega-db --bin seed -- --db ./data/bodega.db
//!
//! # Generate more weeks of history
//! cargo run -p bodega-db --bin seed -- --weeks 16
//! ```
//!
//! The generated data is deterministic: the same arguments always produce
//! the same quantities and totals (dates are relative to the current time).

use std::env;

use chrono::{Duration, Utc};

use bodega_core::{LineProduct, NewOrder, NewProduct, NewSale, OrderLine, Product, SaleLine};
use bodega_db::{Database, DbConfig};

/// The demo catalog: (name, category, unit cost price, stock).
const CATALOG: &[(&str, &str, f64, i64)] = &[
    ("Arroz", "Granos", 2.5, 100),
    ("Leche", "Lácteos", 1.8, 50),
    ("Pan", "Panadería", 0.75, 30),
    ("Huevos", "Lácteos", 3.2, 200),
    ("Aceite de Girasol", "Aceites", 5.5, 80),
    ("Azúcar", "Dulces", 1.2, 150),
    ("Pasta", "Granos", 2.0, 90),
    ("Manzanas", "Frutas", 0.8, 60),
    ("Frijoles", "Granos", 2.8, 120),
    ("Yogur", "Lácteos", 1.5, 40),
    ("Bananas", "Frutas", 0.6, 70),
];

const SUPPLIERS: &[&str] = &[
    "Distribuidora Norte",
    "Alimentos del Valle",
    "Granos y Más",
];

/// Markup applied to the catalog cost to get the realized sale price.
const SALE_MARKUP: f64 = 1.35;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./bodega.db");
    let mut weeks: i64 = 10;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--weeks" | "-w" => {
                if i + 1 < args.len() {
                    weeks = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Bodega Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: ./bodega.db)");
                println!("  -w, --weeks <N>     Weeks of history to generate (default: 10)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Bodega Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("History:  {} weeks", weeks);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Catalog
    println!();
    println!("Seeding catalog...");
    let mut products: Vec<Product> = Vec::with_capacity(CATALOG.len());
    for (idx, &(name, category, price, stock)) in CATALOG.iter().enumerate() {
        let product = db
            .products()
            .insert(&NewProduct {
                name: name.to_string(),
                sku: Some(format!(
                    "{}-{:03}",
                    category.chars().take(3).collect::<String>().to_uppercase(),
                    idx + 1
                )),
                description: None,
                category: category.to_string(),
                price,
                stock,
            })
            .await?;
        products.push(product);
    }
    println!("✓ {} products", products.len());

    // Sales history
    println!("Seeding sales history...");
    let now = Utc::now();
    let mut sale_count = 0usize;
    for day in 0..(weeks * 7) {
        // 1-3 sales per day, varying deterministically
        let sales_today = 1 + (day % 3) as usize;
        for slot in 0..sales_today {
            let seed = (day as usize) * 13 + slot * 7;
            let lines = build_sale_lines(&products, seed);
            let total: f64 = lines.iter().map(SaleLine::revenue).sum();
            let cost: f64 = lines
                .iter()
                .map(|l| catalog_cost(&products, l) * l.quantity as f64)
                .sum();

            db.sales()
                .create(&NewSale {
                    customer: if seed % 4 == 0 {
                        Some(format!("Cliente {}", seed % 23 + 1))
                    } else {
                        None
                    },
                    sale_date: Some(now - Duration::days(day) - Duration::hours(2 + slot as i64 * 3)),
                    total_amount: total,
                    gain: total - cost,
                    lines,
                })
                .await?;
            sale_count += 1;
        }

        if day > 0 && day % 30 == 0 {
            println!("  {} days generated...", day);
        }
    }
    println!("✓ {} sales", sale_count);

    // Purchase orders: one per week, older ones received
    println!("Seeding purchase orders...");
    let mut order_count = 0usize;
    for week in 0..weeks {
        let seed = week as usize * 11;
        let product = &products[seed % products.len()];
        let quantity = 40 + (seed % 5) as i64 * 20;
        let lines = vec![OrderLine {
            product: LineProduct::Resolved {
                product_id: product.id.clone(),
                name: product.name.clone(),
            },
            quantity,
            unit_cost: product.price * 0.8,
        }];
        let total: f64 = lines.iter().map(OrderLine::cost).sum();

        let order = db
            .orders()
            .create(&NewOrder {
                supplier: Some(SUPPLIERS[seed % SUPPLIERS.len()].to_string()),
                order_date: Some(now - Duration::weeks(week) - Duration::hours(5)),
                total_amount: total,
                lines,
            })
            .await?;

        // Everything older than two weeks has been received.
        if week >= 2 {
            db.orders().mark_completed(&order.id).await?;
        }
        order_count += 1;
    }
    println!("✓ {} orders", order_count);

    println!();
    println!("✓ Seed complete!");
    println!("  Run the dashboard: cargo run -p bodega-dashboard -- --db {}", db_path);

    Ok(())
}

/// Builds 1-3 sale lines, picking products deterministically from the seed.
fn build_sale_lines(products: &[Product], seed: usize) -> Vec<SaleLine> {
    let line_count = 1 + seed % 3;
    (0..line_count)
        .map(|n| {
            let product = &products[(seed + n * 5) % products.len()];
            SaleLine {
                product: LineProduct::Resolved {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                },
                quantity: 1 + ((seed + n) % 4) as i64,
                sale_price: product.price * SALE_MARKUP,
            }
        })
        .collect()
}

/// Catalog cost for a line's product (0 when the reference is dangling).
fn catalog_cost(products: &[Product], line: &SaleLine) -> f64 {
    line.product
        .product_id()
        .and_then(|id| products.iter().find(|p| p.id == id))
        .map(|p| p.price)
        .unwrap_or(0.0)
}
