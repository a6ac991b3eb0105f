//! Category endpoints

use axum::{extract::State, http::StatusCode, Json};
use catalog_common::db::Category;

use crate::api::attributes::NameRequest;
use crate::api::extract::ValidJson;
use crate::db;
use crate::error::ApiError;
use crate::AppState;

/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(db::list_categories(&state.db).await?))
}

/// POST /categories
pub async fn create_category(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<NameRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = request.name.unwrap_or_default();
    let category = db::create_category(&state.db, &name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
