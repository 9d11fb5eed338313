//! # Order Placement
//!
//! Turns a customer's request into a persisted order, taking stock for every
//! line, as one all-or-nothing unit.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     OrderPlacement::place                               │
//! │                                                                         │
//! │  validate_place_order(request)        ← no I/O yet                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line (caller order):                                         │
//! │     ├── conditional decrement ── fails? ──► drop tx (ROLLBACK), Err    │
//! │     └── read name/category/price for the line                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  order_total(lines)                   ← checked, PriceOverflow         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT orders (status = placed), INSERT ordered_products ...          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT → PlacedOrder { id, price }                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first statement in the transaction is a write, so SQLite hands out
//! the write lock before anything is read.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{order, product};
use shop_core::pricing::{order_total, PricedLine};
use shop_core::validation::validate_place_order;
use shop_core::{Money, NewOrderLine, NewOrderRecord, OrderStatus, PlaceOrderRequest};

/// Outcome of a successful placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: String,
    /// Total in the base currency.
    pub price: Money,
}

/// The order placement workflow.
#[derive(Debug, Clone)]
pub struct OrderPlacement {
    pool: SqlitePool,
}

impl OrderPlacement {
    pub fn new(pool: SqlitePool) -> Self {
        OrderPlacement { pool }
    }

    /// Places an order.
    ///
    /// ## Errors
    /// * `Domain` - The request is empty, too large, or has a bad quantity
    /// * `NotFound` - A line references a product that doesn't exist
    /// * `InsufficientStock` - A line asks for more than is in stock
    ///
    /// On any error nothing is persisted and no stock is taken.
    pub async fn place(&self, request: PlaceOrderRequest) -> DbResult<PlacedOrder> {
        validate_place_order(&request)?;

        debug!(lines = request.products.len(), "Placing order");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let mut priced = Vec::with_capacity(request.products.len());
        let mut lines = Vec::with_capacity(request.products.len());

        for (line_no, wanted) in request.products.iter().enumerate() {
            if let Err(err) = product::decrement_on(&mut tx, &wanted.product_id, wanted.quantity).await
            {
                warn!(
                    product_id = %wanted.product_id,
                    quantity = wanted.quantity,
                    error = %err,
                    "Order rejected"
                );
                return Err(err);
            }

            let current = product::fetch_on(&mut tx, &wanted.product_id)
                .await?
                .ok_or_else(|| DbError::not_found("Product", &wanted.product_id))?;

            priced.push(PricedLine::new(current.price(), wanted.quantity));
            lines.push(NewOrderLine {
                product_id: current.id,
                quantity: wanted.quantity,
                line_no: line_no as i64,
                name_snapshot: current.name,
                category_snapshot: current.category,
                unit_price_cents: current.price_cents,
            });
        }

        let price = order_total(&priced)?;

        let record = NewOrderRecord {
            name: request.name,
            address: request.address,
            phone: request.phone,
            price_cents: price.cents(),
            status: OrderStatus::Placed,
        };

        let id = order::insert_record_on(&mut tx, &record).await?;
        for line in &lines {
            order::insert_line_on(&mut tx, &id, line).await?;
        }

        tx.commit().await.map_err(DbError::transaction)?;

        info!(id = %id, lines = lines.len(), price = %price, "Order placed");
        Ok(PlacedOrder { id, price })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use shop_core::{CoreError, LineRequest, NewProduct};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn stock(db: &Database, name: &str, quantity: i64, price_cents: i64) -> String {
        db.products()
            .create(NewProduct {
                name: name.to_string(),
                category: "Men Shirts".to_string(),
                quantity,
                price_cents,
            })
            .await
            .unwrap()
    }

    fn request(lines: &[(&str, i64)]) -> PlaceOrderRequest {
        PlaceOrderRequest {
            name: "Ivan Ivanov".to_string(),
            address: "Sofia Mladost 2".to_string(),
            phone: "0888888888".to_string(),
            products: lines
                .iter()
                .map(|(id, quantity)| LineRequest {
                    product_id: id.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_place_decrements_and_prices() {
        let db = test_db().await;
        let a = stock(&db, "Men Red Shirt", 10, 1999).await;
        let b = stock(&db, "Men Blue Shirt", 5, 2500).await;

        let placed = db
            .placement()
            .place(request(&[(&a, 2), (&b, 1)]))
            .await
            .unwrap();

        assert_eq!(placed.price, Money::from_cents(2 * 1999 + 2500));
        assert_eq!(db.products().get(&a).await.unwrap().quantity, 8);
        assert_eq!(db.products().get(&b).await.unwrap().quantity, 4);

        let order = db.orders().get(&placed.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.price_cents, 6498);
        assert_eq!(order.products.len(), 2);
        assert_eq!(order.products[0].product_id, a);
        assert_eq!(order.products[0].quantity, 2);
        assert_eq!(order.products[0].name, "Men Red Shirt");
        assert_eq!(order.products[1].product_id, b);
        assert_eq!(order.products[1].price_cents, 2500);

        let lines = db.orders().list_lines(&placed.id).await.unwrap();
        assert_eq!(lines[0].name_snapshot, "Men Red Shirt");
        assert_eq!(lines[1].unit_price_cents, 2500);
    }

    #[tokio::test]
    async fn test_unfulfillable_line_rolls_back_everything() {
        let db = test_db().await;
        let a = stock(&db, "Men Red Shirt", 10, 1999).await;
        let b = stock(&db, "Men Blue Shirt", 1, 2500).await;

        let err = db
            .placement()
            .place(request(&[(&a, 2), (&b, 3)]))
            .await
            .unwrap_err();

        match err {
            DbError::InsufficientStock { product_id, .. } => assert_eq!(product_id, b),
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(db.products().get(&a).await.unwrap().quantity, 10);
        assert_eq!(db.products().get(&b).await.unwrap().quantity, 1);
        assert!(db.orders().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_product_rejects_order() {
        let db = test_db().await;
        let a = stock(&db, "Men Red Shirt", 10, 1999).await;

        let err = db
            .placement()
            .place(request(&[(&a, 1), ("missing", 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(db.products().get(&a).await.unwrap().quantity, 10);
        assert!(db.orders().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_product_lines_share_stock() {
        let db = test_db().await;
        let a = stock(&db, "Men Red Shirt", 3, 100).await;

        let err = db
            .placement()
            .place(request(&[(&a, 2), (&a, 2)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { available: 1, .. }));
        assert_eq!(db.products().get(&a).await.unwrap().quantity, 3);

        db.placement()
            .place(request(&[(&a, 2), (&a, 1)]))
            .await
            .unwrap();
        assert_eq!(db.products().get(&a).await.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn test_invalid_request_touches_nothing() {
        let db = test_db().await;
        let a = stock(&db, "Men Red Shirt", 3, 100).await;

        assert!(matches!(
            db.placement().place(request(&[])).await,
            Err(DbError::Domain(CoreError::EmptyOrder))
        ));
        assert!(db.placement().place(request(&[(&a, 0)])).await.is_err());
        assert_eq!(db.products().get(&a).await.unwrap().quantity, 3);
        assert!(db.orders().list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_never_oversell() {
        const STOCK: i64 = 5;
        const ATTEMPTS: usize = 30;

        let path = std::env::temp_dir().join(format!("shop-placement-{}.db", uuid::Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(8))
            .await
            .unwrap();
        let a = stock(&db, "Men Red Shirt", STOCK, 1999).await;

        let handles: Vec<_> = (0..ATTEMPTS)
            .map(|_| {
                let placement = db.placement();
                let a = a.clone();
                tokio::spawn(async move { placement.place(request(&[(&a, 1)])).await })
            })
            .collect();

        let mut placed = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => placed += 1,
                Err(DbError::InsufficientStock { .. }) => rejected += 1,
                Err(other) => panic!("unexpected placement error: {other}"),
            }
        }

        assert_eq!(placed, STOCK as usize);
        assert_eq!(rejected, ATTEMPTS - STOCK as usize);
        assert_eq!(db.products().get(&a).await.unwrap().quantity, 0);
        assert_eq!(db.orders().list().await.unwrap().len(), STOCK as usize);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
