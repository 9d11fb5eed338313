//! HTTP route table.
//!
//! ```text
//! GET    /health
//! GET    /product                 ?currency=
//! POST   /product
//! GET    /product/:id             ?currency=
//! PUT    /product/:id
//! DELETE /delete/product/:id
//! GET    /order                   ?currency=
//! POST   /order
//! GET    /order/:id               ?currency=
//! PUT    /order/:id
//! PUT    /order/:id/status
//! DELETE /delete/order/:id
//! ```

pub mod health;
pub mod orders;
pub mod products;

use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/product",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/product/:id",
            get(products::get_product).put(products::update_product),
        )
        .route("/delete/product/:id", delete(products::delete_product))
        .route("/order", get(orders::list_orders).post(orders::place_order))
        .route(
            "/order/:id",
            get(orders::get_order).put(orders::update_order),
        )
        .route("/order/:id/status", put(orders::update_status))
        .route("/delete/order/:id", delete(orders::delete_order))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
