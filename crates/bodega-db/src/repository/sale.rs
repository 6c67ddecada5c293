//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Recording a Sale                                    │
//! │                                                                         │
//! │  Entry form totals (total_amount, gain) + line items                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_new_sale() ── reject before any SQL                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                     │
//! │    INSERT INTO sales ...                                               │
//! │    INSERT INTO sale_lines ... (one per line)                           │
//! │  COMMIT                                                                │
//! │                                                                         │
//! │  Either the sale lands with all its lines, or not at all.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::validation::validate_new_sale;
use bodega_core::{LineProduct, NewSale, Sale, SaleLine};

/// Line row as stored; folded into [`LineProduct`] when loading.
#[derive(Debug, sqlx::FromRow)]
struct SaleLineRow {
    sale_id: String,
    product_id: Option<String>,
    product_name: String,
    quantity: i64,
    sale_price: f64,
}

impl SaleLineRow {
    fn into_line(self) -> SaleLine {
        let product = match self.product_id {
            Some(product_id) => LineProduct::Resolved {
                product_id,
                name: self.product_name,
            },
            None => LineProduct::NamedOnly {
                name: self.product_name,
            },
        };
        SaleLine {
            product,
            quantity: self.quantity,
            sale_price: self.sale_price,
        }
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists all sales with their lines, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let mut sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer, sale_date, total_amount, gain, created_at
            FROM sales
            ORDER BY sale_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // One query for every line, grouped in memory; avoids a query per sale.
        let rows = sqlx::query_as::<_, SaleLineRow>(
            r#"
            SELECT sale_id, product_id, product_name, quantity, sale_price
            FROM sale_lines
            ORDER BY sale_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut lines_by_sale: std::collections::HashMap<String, Vec<SaleLine>> =
            std::collections::HashMap::with_capacity(sales.len());
        for row in rows {
            let sale_id = row.sale_id.clone();
            lines_by_sale
                .entry(sale_id)
                .or_default()
                .push(row.into_line());
        }

        for sale in &mut sales {
            if let Some(lines) = lines_by_sale.remove(&sale.id) {
                sale.lines = lines;
            }
        }

        debug!(count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Gets a sale by ID with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer, sale_date, total_amount, gain, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut sale) = sale else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, SaleLineRow>(
            r#"
            SELECT sale_id, product_id, product_name, quantity, sale_price
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        sale.lines = rows.into_iter().map(SaleLineRow::into_line).collect();
        Ok(Some(sale))
    }

    /// Records a sale together with its lines in one transaction.
    ///
    /// ## Arguments
    /// * `new` - Validated before insert. `sale_date` defaults to now.
    ///
    /// ## Returns
    /// The stored sale with its generated id.
    pub async fn create(&self, new: &NewSale) -> DbResult<Sale> {
        validate_new_sale(new)?;

        let now = Utc::now();
        let sale = Sale {
            id: generate_sale_id(),
            customer: new.customer.clone(),
            sale_date: new.sale_date.unwrap_or(now),
            total_amount: new.total_amount,
            gain: new.gain,
            lines: new.lines.clone(),
            created_at: now,
        };

        debug!(id = %sale.id, lines = sale.lines.len(), "Recording sale");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, customer, sale_date, total_amount, gain, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer)
        .bind(sale.sale_date)
        .bind(sale.total_amount)
        .bind(sale.gain)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &sale.lines {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (id, sale_id, product_id, product_name, quantity, sale_price)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(generate_line_id())
            .bind(&sale.id)
            .bind(line.product.product_id())
            .bind(line.product.name())
            .bind(line.quantity)
            .bind(line.sale_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(sale)
    }

    /// Deletes a sale; its lines cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new line-item ID.
fn generate_line_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, Utc};

    fn line(name: &str, product_id: Option<&str>, quantity: i64, sale_price: f64) -> SaleLine {
        let product = match product_id {
            Some(id) => LineProduct::Resolved {
                product_id: id.to_string(),
                name: name.to_string(),
            },
            None => LineProduct::NamedOnly {
                name: name.to_string(),
            },
        };
        SaleLine {
            product,
            quantity,
            sale_price,
        }
    }

    fn new_sale(days_ago: i64, total: f64, gain: f64, lines: Vec<SaleLine>) -> NewSale {
        NewSale {
            customer: None,
            sale_date: Some(Utc::now() - Duration::days(days_ago)),
            total_amount: total,
            gain,
            lines,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_list_with_lines() {
        let db = test_db().await;
        let repo = db.sales();

        repo.create(&new_sale(
            2,
            100.0,
            40.0,
            vec![line("Arroz", Some("p-1"), 2, 50.0)],
        ))
        .await
        .unwrap();
        repo.create(&new_sale(1, 30.0, 5.0, vec![line("Pan", None, 3, 10.0)]))
            .await
            .unwrap();

        let sales = repo.list().await.unwrap();
        assert_eq!(sales.len(), 2);

        // Most recent first.
        assert_eq!(sales[0].total_amount, 30.0);
        assert_eq!(sales[1].total_amount, 100.0);

        // Lines come back with their reference style intact.
        assert_eq!(sales[0].lines.len(), 1);
        assert_eq!(
            sales[0].lines[0].product,
            LineProduct::NamedOnly {
                name: "Pan".to_string()
            }
        );
        assert_eq!(
            sales[1].lines[0].product,
            LineProduct::Resolved {
                product_id: "p-1".to_string(),
                name: "Arroz".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_sale() {
        let db = test_db().await;
        let repo = db.sales();

        // No lines.
        let err = repo
            .create(&new_sale(0, 100.0, 40.0, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        // Bad quantity.
        let err = repo
            .create(&new_sale(0, 100.0, 40.0, vec![line("Arroz", None, 0, 50.0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        // Nothing was persisted.
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_by_id_and_delete_cascades_lines() {
        let db = test_db().await;
        let repo = db.sales();

        let sale = repo
            .create(&new_sale(
                0,
                100.0,
                40.0,
                vec![
                    line("Arroz", Some("p-1"), 2, 25.0),
                    line("Leche", Some("p-2"), 1, 50.0),
                ],
            ))
            .await
            .unwrap();

        let fetched = repo.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(fetched.lines.len(), 2);

        repo.delete(&sale.id).await.unwrap();
        assert!(repo.get_by_id(&sale.id).await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_lines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);

        let err = repo.delete(&sale.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
