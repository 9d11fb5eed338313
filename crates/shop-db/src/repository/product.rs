//! # Product Repository
//!
//! Catalog Store: product CRUD and atomic stock adjustment.
//!
//! ## Check-and-Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  How a stock decrement is applied                       │
//! │                                                                         │
//! │  decrement_quantity("p-1", 3)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE products SET quantity = quantity - 3                           │
//! │   WHERE id = 'p-1' AND quantity >= 3                                   │
//! │       │                                                                 │
//! │       ├── 1 row affected → done                                        │
//! │       │                                                                 │
//! │       └── 0 rows affected → SELECT quantity WHERE id = 'p-1'           │
//! │                ├── no row   → NotFound                                 │
//! │                └── row (2)  → InsufficientStock { available: 2 }       │
//! │                                                                         │
//! │  The check and the write are one statement: two concurrent orders     │
//! │  can never both take the last unit.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The connection-level functions (`fetch_on`, `decrement_on`) take a
//! `&mut SqliteConnection` so the placement workflow can run them inside its
//! own transaction.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use shop_core::validation::validate_new_product;
use shop_core::{NewProduct, Product, ValidationError};

const PRODUCT_COLUMNS: &str =
    "id, name, category, quantity, price_cents, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let id = repo.create(NewProduct { .. }).await?;
/// let product = repo.get(&id).await?;
/// repo.decrement_quantity(&id, 2).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Product found
    /// * `Err(DbError::NotFound)` - No product with this id
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        let mut conn = self.pool.acquire().await?;
        fetch_on(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Inserts a new product and returns its generated id.
    pub async fn create(&self, product: NewProduct) -> DbResult<String> {
        validate_new_product(&product)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products (id, name, category, quantity, price_cents, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        )
        .bind(&id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.quantity)
        .bind(product.price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Replaces every mutable field of an existing product.
    pub async fn update(&self, id: &str, product: NewProduct) -> DbResult<()> {
        validate_new_product(&product)?;

        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            "UPDATE products
             SET name = ?2, category = ?3, quantity = ?4, price_cents = ?5, updated_at = ?6
             WHERE id = ?1",
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.quantity)
        .bind(product.price_cents)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Orders that reference the product keep their lines and fall back to
    /// the snapshot taken at placement.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Takes `amount` units out of stock, or fails without changing anything.
    ///
    /// ## Errors
    /// * `NotFound` - No product with this id
    /// * `InsufficientStock` - Fewer than `amount` units available
    pub async fn decrement_quantity(&self, id: &str, amount: i64) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        decrement_on(&mut conn, id, amount).await
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-level operations
// =============================================================================

fn ensure_positive(amount: i64) -> DbResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Reads one product on the given connection.
pub(crate) async fn fetch_on(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(product)
}

/// Conditional decrement on the given connection.
pub(crate) async fn decrement_on(
    conn: &mut SqliteConnection,
    id: &str,
    amount: i64,
) -> DbResult<()> {
    ensure_positive(amount)?;

    debug!(id = %id, amount, "Decrementing stock");

    let result = sqlx::query(
        "UPDATE products
         SET quantity = quantity - ?2, updated_at = ?3
         WHERE id = ?1 AND quantity >= ?2",
    )
    .bind(id)
    .bind(amount)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    let available: Option<i64> = sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match available {
        None => Err(DbError::not_found("Product", id)),
        Some(available) => Err(DbError::InsufficientStock {
            product_id: id.to_string(),
            available,
            requested: amount,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shop_core::CoreError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn shirt(quantity: i64) -> NewProduct {
        NewProduct {
            name: "Men Red Shirt".to_string(),
            category: "Men Shirts".to_string(),
            quantity,
            price_cents: 1999,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let repo = test_db().await.products();

        let id = repo.create(shirt(1000)).await.unwrap();
        let product = repo.get(&id).await.unwrap();

        assert_eq!(product.id, id);
        assert_eq!(product.name, "Men Red Shirt");
        assert_eq!(product.category, "Men Shirts");
        assert_eq!(product.quantity, 1000);
        assert_eq!(product.price_cents, 1999);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = test_db().await.products();

        let first = repo.create(shirt(1)).await.unwrap();
        let mut hat = shirt(5);
        hat.name = "Grey Hat".to_string();
        let second = repo.create(hat).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_product() {
        let repo = test_db().await.products();

        let err = repo.create(shirt(-1)).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_missing_product() {
        let repo = test_db().await.products();
        assert!(matches!(
            repo.get("missing").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_changes_only_that_row() {
        let repo = test_db().await.products();
        let a = repo.create(shirt(10)).await.unwrap();
        let b = repo.create(shirt(20)).await.unwrap();

        let mut changed = shirt(7);
        changed.price_cents = 2500;
        repo.update(&a, changed).await.unwrap();

        let a = repo.get(&a).await.unwrap();
        let b = repo.get(&b).await.unwrap();
        assert_eq!((a.quantity, a.price_cents), (7, 2500));
        assert_eq!((b.quantity, b.price_cents), (20, 1999));

        assert!(matches!(
            repo.update("missing", shirt(1)).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = test_db().await.products();
        let id = repo.create(shirt(1)).await.unwrap();

        repo.delete(&id).await.unwrap();
        assert!(matches!(repo.get(&id).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.delete(&id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_decrements_subtract_exactly() {
        let repo = test_db().await.products();
        let id = repo.create(shirt(10)).await.unwrap();

        repo.decrement_quantity(&id, 3).await.unwrap();
        repo.decrement_quantity(&id, 4).await.unwrap();
        repo.decrement_quantity(&id, 3).await.unwrap();

        assert_eq!(repo.get(&id).await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_over_decrement_leaves_stock_unchanged() {
        let repo = test_db().await.products();
        let id = repo.create(shirt(2)).await.unwrap();

        let err = repo.decrement_quantity(&id, 3).await.unwrap_err();
        match err {
            DbError::InsufficientStock {
                product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, id);
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(repo.get(&id).await.unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_decrement_missing_product() {
        let repo = test_db().await.products();
        assert!(matches!(
            repo.decrement_quantity("missing", 1).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_decrement_rejects_non_positive_amount() {
        let repo = test_db().await.products();
        let id = repo.create(shirt(2)).await.unwrap();

        assert!(matches!(
            repo.decrement_quantity(&id, 0).await,
            Err(DbError::Domain(_))
        ));
        assert!(repo.decrement_quantity(&id, -5).await.is_err());
        assert_eq!(repo.get(&id).await.unwrap().quantity, 2);
    }
}
