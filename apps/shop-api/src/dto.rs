//! Request and response bodies.
//!
//! Prices leave the API converted into the currency asked for with
//! `?currency=`; `price_cents` is in minor units of `currency`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_core::{CoreResult, Currency, CurrencyTable, Money, Order, OrderedProduct, Product};

// =============================================================================
// Requests
// =============================================================================

/// `?currency=EUR` on read endpoints. Missing or unknown codes mean the base
/// currency.
#[derive(Debug, Default, Deserialize)]
pub struct CurrencyQuery {
    pub currency: Option<String>,
}

/// Body of `PUT /order/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderRequest {
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Body of `PUT /order/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct PlacedOrderResponse {
    pub id: String,
    /// Order total in the base currency.
    pub price_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub currency: Currency,
    pub price_display: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn new(product: Product, table: &CurrencyTable, currency: Currency) -> CoreResult<Self> {
        let price = table.convert_to(product.price(), currency)?;
        Ok(ProductResponse {
            id: product.id,
            name: product.name,
            category: product.category,
            quantity: product.quantity,
            price_cents: price.amount.cents(),
            currency: price.currency,
            price_display: price.display(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OrderedProductResponse {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    /// Unit price.
    pub price_cents: i64,
    pub price_display: String,
    pub in_catalog: bool,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub status: String,
    pub price_cents: i64,
    pub currency: Currency,
    pub price_display: String,
    pub created_at: DateTime<Utc>,
    pub products: Vec<OrderedProductResponse>,
}

impl OrderResponse {
    pub fn new(order: Order, table: &CurrencyTable, currency: Currency) -> CoreResult<Self> {
        let convert = |amount: Money| table.convert_to(amount, currency);
        let price = convert(order.price())?;

        let products = order
            .products
            .into_iter()
            .map(|line: OrderedProduct| {
                let unit = convert(line.unit_price())?;
                Ok(OrderedProductResponse {
                    product_id: line.product_id,
                    name: line.name,
                    category: line.category,
                    quantity: line.quantity,
                    price_cents: unit.amount.cents(),
                    price_display: unit.display(),
                    in_catalog: line.in_catalog,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(OrderResponse {
            id: order.id,
            name: order.name,
            address: order.address,
            phone: order.phone,
            status: order.status.to_string(),
            price_cents: price.amount.cents(),
            currency: price.currency,
            price_display: price.display(),
            created_at: order.created_at,
            products,
        })
    }
}
