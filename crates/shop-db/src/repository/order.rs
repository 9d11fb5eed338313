//! # Order Repository
//!
//! Order Store: order records and their lines.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Storage                                     │
//! │                                                                         │
//! │   orders                         ordered_products                       │
//! │   ┌──────────────────────┐       ┌───────────────────────────────┐     │
//! │   │ id                   │◄──────│ order_id                      │     │
//! │   │ name, address, phone │  1:N  │ product_id ──► products (live)│     │
//! │   │ price_cents, status  │       │ quantity, line_no             │     │
//! │   └──────────────────────┘       │ *_snapshot (fallback)         │     │
//! │                                  └───────────────────────────────┘     │
//! │                                                                         │
//! │  Reads LEFT JOIN each line against the catalog. Current name,          │
//! │  category and price win; the snapshot is used once the product has     │
//! │  been deleted.                                                         │
//! │                                                                         │
//! │  delete(): lines first, then the order row, in one transaction.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use shop_core::validation::{validate_line_quantity, validate_order_total};
use shop_core::{
    CoreError, NewOrderLine, NewOrderRecord, Order, OrderLine, OrderRecord, OrderStatus,
    OrderedProduct,
};

const ORDER_COLUMNS: &str = "id, name, address, phone, price_cents, status, created_at";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Lists every order with its lines resolved.
    ///
    /// A failure resolving any order's lines fails the whole listing.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let records = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(records.len());
        for record in records {
            let products = self.resolve_lines(&record.id).await?;
            orders.push(Order::from_record(record, products));
        }

        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }

    /// Gets an order by ID with its lines resolved.
    pub async fn get(&self, id: &str) -> DbResult<Order> {
        let record = self
            .get_record(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))?;

        let products = self.resolve_lines(id).await?;
        Ok(Order::from_record(record, products))
    }

    async fn get_record(&self, id: &str) -> DbResult<Option<OrderRecord>> {
        let record = sqlx::query_as::<_, OrderRecord>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Resolves an order's lines against the current catalog, in line order.
    async fn resolve_lines(&self, order_id: &str) -> DbResult<Vec<OrderedProduct>> {
        let products = sqlx::query_as::<_, OrderedProduct>(
            r#"
            SELECT
                l.product_id,
                COALESCE(p.name, l.name_snapshot) AS name,
                COALESCE(p.category, l.category_snapshot) AS category,
                l.quantity,
                COALESCE(p.price_cents, l.unit_price_cents) AS price_cents,
                p.id IS NOT NULL AS in_catalog
            FROM ordered_products l
            LEFT JOIN products p ON p.id = l.product_id
            WHERE l.order_id = ?1
            ORDER BY l.line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts the scalar fields of a new order and returns its id.
    pub async fn create_record(&self, record: &NewOrderRecord) -> DbResult<String> {
        validate_order_total(record.price_cents)?;

        let mut conn = self.pool.acquire().await?;
        insert_record_on(&mut conn, record).await
    }

    /// Inserts one order line.
    ///
    /// ## Errors
    /// * `NotFound` - The order does not exist
    pub async fn add_line(&self, order_id: &str, line: &NewOrderLine) -> DbResult<()> {
        validate_line_quantity(line.quantity)?;

        let mut conn = self.pool.acquire().await?;
        match insert_line_on(&mut conn, order_id, line).await {
            // quantity is already validated, so the only remaining constraint
            // is the reference to orders
            Err(DbError::ConstraintViolation { .. }) => Err(DbError::not_found("Order", order_id)),
            other => other,
        }
    }

    /// Replaces name, address, phone and price of an existing order.
    ///
    /// Lines and status are not touched.
    pub async fn update_record(&self, record: &OrderRecord) -> DbResult<()> {
        validate_order_total(record.price_cents)?;

        debug!(id = %record.id, "Updating order");

        let result = sqlx::query(
            "UPDATE orders SET name = ?2, address = ?3, phone = ?4, price_cents = ?5 WHERE id = ?1",
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.address)
        .bind(&record.phone)
        .bind(record.price_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", &record.id));
        }

        Ok(())
    }

    /// Deletes an order and all its lines as one unit.
    ///
    /// Stock taken by the order is not returned to the catalog.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let lines = sqlx::query("DELETE FROM ordered_products WHERE order_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the line delete
            return Err(DbError::not_found("Order", id));
        }

        tx.commit().await.map_err(DbError::transaction)?;

        info!(id = %id, lines = lines.rows_affected(), "Order deleted");
        Ok(())
    }

    /// Lists the raw association rows of an order, in line order.
    pub async fn list_lines(&self, order_id: &str) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            "SELECT id, order_id, product_id, quantity, line_no,
                    name_snapshot, category_snapshot, unit_price_cents
             FROM ordered_products
             WHERE order_id = ?1
             ORDER BY line_no",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Moves an order to `next` if the transition table allows it.
    ///
    /// Re-applying the current status is a no-op.
    pub async fn update_status(&self, id: &str, next: OrderStatus) -> DbResult<()> {
        let current = self.status_of(id).await?;
        current.transition_to(next)?;

        if current == next {
            return Ok(());
        }

        // Only applies if nobody changed the status since it was read
        let result = sqlx::query("UPDATE orders SET status = ?2 WHERE id = ?1 AND status = ?3")
            .bind(id)
            .bind(next)
            .bind(current)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            let now = self.status_of(id).await?;
            if now != next {
                return Err(CoreError::InvalidStatusTransition { from: now, to: next }.into());
            }
        }

        info!(id = %id, from = %current, to = %next, "Order status changed");
        Ok(())
    }

    async fn status_of(&self, id: &str) -> DbResult<OrderStatus> {
        sqlx::query_scalar::<_, OrderStatus>("SELECT status FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }
}

// =============================================================================
// Connection-level operations
// =============================================================================

/// Inserts an order row on the given connection and returns its id.
pub(crate) async fn insert_record_on(
    conn: &mut SqliteConnection,
    record: &NewOrderRecord,
) -> DbResult<String> {
    let id = Uuid::new_v4().to_string();

    debug!(id = %id, price_cents = record.price_cents, "Inserting order");

    sqlx::query(
        "INSERT INTO orders (id, name, address, phone, price_cents, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&id)
    .bind(&record.name)
    .bind(&record.address)
    .bind(&record.phone)
    .bind(record.price_cents)
    .bind(record.status)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(id)
}

/// Inserts one order line on the given connection.
pub(crate) async fn insert_line_on(
    conn: &mut SqliteConnection,
    order_id: &str,
    line: &NewOrderLine,
) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO ordered_products (
            id, order_id, product_id, quantity, line_no,
            name_snapshot, category_snapshot, unit_price_cents
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(order_id)
    .bind(&line.product_id)
    .bind(line.quantity)
    .bind(line.line_no)
    .bind(&line.name_snapshot)
    .bind(&line.category_snapshot)
    .bind(line.unit_price_cents)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shop_core::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn customer(price_cents: i64) -> NewOrderRecord {
        NewOrderRecord {
            name: "Ivan Ivanov".to_string(),
            address: "Sofia Mladost 2".to_string(),
            phone: "0888888888".to_string(),
            price_cents,
            status: OrderStatus::Placed,
        }
    }

    fn line(product_id: &str, quantity: i64, line_no: i64) -> NewOrderLine {
        NewOrderLine {
            product_id: product_id.to_string(),
            quantity,
            line_no,
            name_snapshot: "Snapshot Name".to_string(),
            category_snapshot: "Snapshot Category".to_string(),
            unit_price_cents: 500,
        }
    }

    async fn product(db: &Database, name: &str, price_cents: i64) -> String {
        db.products()
            .create(NewProduct {
                name: name.to_string(),
                category: "Shirts".to_string(),
                quantity: 10,
                price_cents,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_order() {
        let db = test_db().await;
        let repo = db.orders();
        let shirt = product(&db, "Red Shirt", 1999).await;

        let id = repo.create_record(&customer(3998)).await.unwrap();
        repo.add_line(&id, &line(&shirt, 2, 0)).await.unwrap();

        let order = repo.get(&id).await.unwrap();
        assert_eq!(order.name, "Ivan Ivanov");
        assert_eq!(order.price_cents, 3998);
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.products.len(), 1);

        let resolved = &order.products[0];
        assert_eq!(resolved.product_id, shirt);
        assert_eq!(resolved.name, "Red Shirt");
        assert_eq!(resolved.price_cents, 1999);
        assert_eq!(resolved.quantity, 2);
        assert!(resolved.in_catalog);
    }

    #[tokio::test]
    async fn test_lines_follow_catalog_and_fall_back_to_snapshot() {
        let db = test_db().await;
        let repo = db.orders();
        let shirt = product(&db, "Red Shirt", 1999).await;
        let hat = product(&db, "Grey Hat", 700).await;

        let id = repo.create_record(&customer(0)).await.unwrap();
        repo.add_line(&id, &line(&shirt, 1, 0)).await.unwrap();
        repo.add_line(&id, &line(&hat, 1, 1)).await.unwrap();

        db.products().delete(&hat).await.unwrap();

        let order = repo.get(&id).await.unwrap();
        assert_eq!(order.products[0].name, "Red Shirt");
        assert!(order.products[0].in_catalog);
        assert_eq!(order.products[1].product_id, hat);
        assert_eq!(order.products[1].name, "Snapshot Name");
        assert_eq!(order.products[1].price_cents, 500);
        assert!(!order.products[1].in_catalog);
    }

    #[tokio::test]
    async fn test_list_orders() {
        let db = test_db().await;
        let repo = db.orders();

        let first = repo.create_record(&customer(1)).await.unwrap();
        let second = repo.create_record(&customer(2)).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn test_add_line_to_missing_order() {
        let db = test_db().await;
        let result = db.orders().add_line("missing", &line("p", 1, 0)).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_record_keeps_lines() {
        let db = test_db().await;
        let repo = db.orders();
        let shirt = product(&db, "Red Shirt", 1999).await;

        let id = repo.create_record(&customer(1999)).await.unwrap();
        repo.add_line(&id, &line(&shirt, 1, 0)).await.unwrap();

        let mut record = repo.get(&id).await.unwrap().record();
        record.address = "Plovdiv Center 1".to_string();
        repo.update_record(&record).await.unwrap();

        let order = repo.get(&id).await.unwrap();
        assert_eq!(order.address, "Plovdiv Center 1");
        assert_eq!(order.products.len(), 1);

        record.id = "missing".to_string();
        assert!(matches!(
            repo.update_record(&record).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_total_is_a_validation_error() {
        let db = test_db().await;
        let repo = db.orders();
        let id = repo.create_record(&customer(1999)).await.unwrap();

        let mut record = repo.get(&id).await.unwrap().record();
        record.price_cents = -1;
        assert!(matches!(
            repo.update_record(&record).await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));

        record.price_cents = i64::MAX;
        assert!(matches!(
            repo.update_record(&record).await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));
        assert_eq!(repo.get(&id).await.unwrap().price_cents, 1999);

        assert!(matches!(
            repo.create_record(&customer(-5)).await,
            Err(DbError::Domain(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_lines_and_order() {
        let db = test_db().await;
        let repo = db.orders();
        let shirt = product(&db, "Red Shirt", 1999).await;

        let id = repo.create_record(&customer(0)).await.unwrap();
        repo.add_line(&id, &line(&shirt, 1, 0)).await.unwrap();
        repo.add_line(&id, &line(&shirt, 2, 1)).await.unwrap();
        assert_eq!(repo.list_lines(&id).await.unwrap().len(), 2);

        repo.delete(&id).await.unwrap();

        assert!(repo.list_lines(&id).await.unwrap().is_empty());
        assert!(matches!(repo.get(&id).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.delete(&id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_order_without_lines() {
        let db = test_db().await;
        let repo = db.orders();

        let id = repo.create_record(&customer(0)).await.unwrap();
        repo.delete(&id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let db = test_db().await;
        let repo = db.orders();
        let id = repo.create_record(&customer(0)).await.unwrap();

        repo.update_status(&id, OrderStatus::Placed).await.unwrap();
        repo.update_status(&id, OrderStatus::Fulfilled).await.unwrap();
        assert_eq!(repo.get(&id).await.unwrap().status, OrderStatus::Fulfilled);

        let err = repo
            .update_status(&id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InvalidStatusTransition { .. })
        ));

        assert!(matches!(
            repo.update_status("missing", OrderStatus::Cancelled).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
