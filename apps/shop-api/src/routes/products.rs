//! Catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use shop_core::NewProduct;
use tracing::info;

use crate::dto::{CreatedResponse, CurrencyQuery, MessageResponse, ProductResponse};
use crate::error::ApiResult;
use crate::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CurrencyQuery>,
) -> ApiResult<Json<Vec<ProductResponse>>> {
    let currency = state.currencies.resolve(query.currency.as_deref());
    let products = state.db.products().list().await?;

    let products = products
        .into_iter()
        .map(|p| ProductResponse::new(p, &state.currencies, currency))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CurrencyQuery>,
) -> ApiResult<Json<ProductResponse>> {
    let currency = state.currencies.resolve(query.currency.as_deref());
    let product = state.db.products().get(&id).await?;

    Ok(Json(ProductResponse::new(
        product,
        &state.currencies,
        currency,
    )?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(product): Json<NewProduct>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state.db.products().create(product).await?;
    info!(id = %id, "Product added");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(product): Json<NewProduct>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.products().update(&id, product).await?;

    Ok(Json(MessageResponse::new(format!("Product {} updated", id))))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.db.products().delete(&id).await?;
    info!(id = %id, "Product deleted");

    Ok(Json(MessageResponse::new(format!("Product {} deleted", id))))
}
