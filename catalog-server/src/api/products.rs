//! Product endpoints
//!
//! - `GET /products` filtered, sorted listing
//! - `GET /products/:id`
//! - `POST /products`
//! - `PUT /products/:id` (attribute list is reconciled against the stored set)
//! - `DELETE /products/:id`

use axum::{extract::State, http::StatusCode, Json};

use crate::api::extract::{ValidJson, ValidPath, ValidQuery};
use crate::db::{self, ProductDetail, ProductInput};
use crate::error::ApiError;
use crate::filter::{ProductFilter, ProductQuery};
use crate::AppState;

/// GET /products?search&sort&order&priceFrom&priceTo&categoryId&attributeNames
pub async fn list_products(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ProductQuery>,
) -> Result<Json<Vec<ProductDetail>>, ApiError> {
    let filter = ProductFilter::from_query(&query)?;
    let products = db::list_products(&state.db, &filter).await?;
    Ok(Json(products))
}

/// GET /products/:id
pub async fn get_product(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<ProductDetail>, ApiError> {
    let mut conn = state.db.acquire().await?;
    db::get_product(&mut conn, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", id)))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ProductInput>,
) -> Result<(StatusCode, Json<ProductDetail>), ApiError> {
    let product = db::create_product(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/:id
pub async fn update_product(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(input): ValidJson<ProductInput>,
) -> Result<Json<ProductDetail>, ApiError> {
    let product = db::update_product(&state.db, id, input).await?;
    Ok(Json(product))
}

/// DELETE /products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<StatusCode, ApiError> {
    db::delete_product(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
