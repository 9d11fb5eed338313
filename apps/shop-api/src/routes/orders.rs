//! Order endpoints.
//!
//! `POST /order` runs the placement workflow; everything else goes straight
//! to the order store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use shop_core::{OrderStatus, PlaceOrderRequest};

use crate::dto::{
    CurrencyQuery, MessageResponse, OrderResponse, PlacedOrderResponse, UpdateOrderRequest,
    UpdateStatusRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<CurrencyQuery>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let currency = state.currencies.resolve(query.currency.as_deref());
    let orders = state.db.orders().list().await?;

    let orders = orders
        .into_iter()
        .map(|o| OrderResponse::new(o, &state.currencies, currency))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CurrencyQuery>,
) -> ApiResult<Json<OrderResponse>> {
    let currency = state.currencies.resolve(query.currency.as_deref());
    let order = state.db.orders().get(&id).await?;

    Ok(Json(OrderResponse::new(order, &state.currencies, currency)?))
}

pub async fn place_order(
    State(state): State<AppState>,
    Json(request): Json<PlaceOrderRequest>,
) -> ApiResult<(StatusCode, Json<PlacedOrderResponse>)> {
    let placed = state.db.placement().place(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(PlacedOrderResponse {
            id: placed.id,
            price_cents: placed.price.cents(),
        }),
    ))
}

/// Replaces the customer contact fields. Price, status and lines stay.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateOrderRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let orders = state.db.orders();

    let mut record = orders.get(&id).await?.record();
    record.name = body.name;
    record.address = body.address;
    record.phone = body.phone;
    orders.update_record(&record).await?;

    Ok(Json(MessageResponse::new(format!("Order {} updated", id))))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let next: OrderStatus = body
        .status
        .parse()
        .map_err(|e: shop_core::ValidationError| ApiError::validation(e.to_string()))?;

    state.db.orders().update_status(&id, next).await?;

    Ok(Json(MessageResponse::new(format!("Order {} is {}", id, next))))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.orders().delete(&id).await?;

    Ok(Json(MessageResponse::new(format!("Order {} deleted", id))))
}
