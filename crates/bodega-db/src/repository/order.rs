//! # Order Repository
//!
//! Database operations for purchase orders and their line items.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Purchase Order Lifecycle                            │
//! │                                                                         │
//! │  1. CREATE                                                              │
//! │     └── create() → Order { status: Pending } + lines (one transaction) │
//! │                                                                         │
//! │  2. RECEIVE                                                             │
//! │     └── mark_completed() → Order { status: Completed }                 │
//! │                                                                         │
//! │  The fulfillment-rate report counts completed vs pending.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::validation::validate_new_order;
use bodega_core::{LineProduct, NewOrder, Order, OrderLine, OrderStatus};

/// Line row as stored; folded into [`LineProduct`] when loading.
#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    order_id: String,
    product_id: Option<String>,
    product_name: String,
    quantity: i64,
    unit_cost: f64,
}

impl OrderLineRow {
    fn into_line(self) -> OrderLine {
        let product = match self.product_id {
            Some(product_id) => LineProduct::Resolved {
                product_id,
                name: self.product_name,
            },
            None => LineProduct::NamedOnly {
                name: self.product_name,
            },
        };
        OrderLine {
            product,
            quantity: self.quantity,
            unit_cost: self.unit_cost,
        }
    }
}

/// Repository for purchase-order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Lists all purchase orders with their lines, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let mut orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, supplier, status, order_date, total_amount, created_at
            FROM orders
            ORDER BY order_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT order_id, product_id, product_name, quantity, unit_cost
            FROM order_lines
            ORDER BY order_id, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut lines_by_order: std::collections::HashMap<String, Vec<OrderLine>> =
            std::collections::HashMap::with_capacity(orders.len());
        for row in rows {
            let order_id = row.order_id.clone();
            lines_by_order
                .entry(order_id)
                .or_default()
                .push(row.into_line());
        }

        for order in &mut orders {
            if let Some(lines) = lines_by_order.remove(&order.id) {
                order.lines = lines;
            }
        }

        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }

    /// Gets an order by ID with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, supplier, status, order_date, total_amount, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut order) = order else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT order_id, product_id, product_name, quantity, unit_cost
            FROM order_lines
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        order.lines = rows.into_iter().map(OrderLineRow::into_line).collect();
        Ok(Some(order))
    }

    /// Records a purchase order together with its lines in one transaction.
    ///
    /// New orders start as [`OrderStatus::Pending`].
    pub async fn create(&self, new: &NewOrder) -> DbResult<Order> {
        validate_new_order(new)?;

        let now = Utc::now();
        let order = Order {
            id: generate_order_id(),
            supplier: new.supplier.clone(),
            status: OrderStatus::Pending,
            order_date: new.order_date.unwrap_or(now),
            total_amount: new.total_amount,
            lines: new.lines.clone(),
            created_at: now,
        };

        debug!(id = %order.id, lines = order.lines.len(), "Recording order");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, supplier, status, order_date, total_amount, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&order.id)
        .bind(&order.supplier)
        .bind(order.status)
        .bind(order.order_date)
        .bind(order.total_amount)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for line in &order.lines {
            sqlx::query(
                r#"
                INSERT INTO order_lines (id, order_id, product_id, product_name, quantity, unit_cost)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(generate_line_id())
            .bind(&order.id)
            .bind(line.product.product_id())
            .bind(line.product.name())
            .bind(line.quantity)
            .bind(line.unit_cost)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(order)
    }

    /// Marks an order as received.
    pub async fn mark_completed(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Marking order completed");

        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(OrderStatus::Completed)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Deletes an order; its lines cascade.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Counts recorded orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new order ID.
pub fn generate_order_id() -> String {
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

    fn order_line(name: &str, quantity: i64, unit_cost: f64) -> OrderLine {
        OrderLine {
            product: LineProduct::NamedOnly {
                name: name.to_string(),
            },
            quantity,
            unit_cost,
        }
    }

    fn new_order(days_ago: i64, total: f64, lines: Vec<OrderLine>) -> NewOrder {
        NewOrder {
            supplier: Some("Distribuidora Norte".to_string()),
            order_date: Some(Utc::now() - Duration::days(days_ago)),
            total_amount: total,
            lines,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_list_and_complete() {
        let db = test_db().await;
        let repo = db.orders();

        let first = repo
            .create(&new_order(3, 400.0, vec![order_line("Arroz", 100, 4.0)]))
            .await
            .unwrap();
        repo.create(&new_order(1, 150.0, vec![order_line("Leche", 50, 3.0)]))
            .await
            .unwrap();

        let orders = repo.list().await.unwrap();
        assert_eq!(orders.len(), 2);
        // Most recent first.
        assert_eq!(orders[0].total_amount, 150.0);
        assert_eq!(orders[0].status, OrderStatus::Pending);
        assert_eq!(orders[1].lines.len(), 1);

        repo.mark_completed(&first.id).await.unwrap();
        let completed = repo.get_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(completed.status, OrderStatus::Completed);
        assert_eq!(completed.lines.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_order() {
        let db = test_db().await;
        let repo = db.orders();

        let err = repo.create(&new_order(0, 100.0, vec![])).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo
            .create(&new_order(0, 100.0, vec![order_line("Arroz", 10, -1.0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_cascades_lines() {
        let db = test_db().await;
        let repo = db.orders();

        let order = repo
            .create(&new_order(0, 100.0, vec![order_line("Pan", 20, 5.0)]))
            .await
            .unwrap();

        repo.delete(&order.id).await.unwrap();
        assert!(repo.get_by_id(&order.id).await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_lines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }
}
