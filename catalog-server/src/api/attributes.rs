//! Attribute definition endpoints

use axum::{extract::State, http::StatusCode, Json};
use catalog_common::db::Attribute;
use serde::Deserialize;

use crate::api::extract::ValidJson;
use crate::db;
use crate::error::ApiError;
use crate::AppState;

/// Body of `POST /attributes` and `POST /categories`
#[derive(Debug, Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// GET /attributes
pub async fn list_attributes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Attribute>>, ApiError> {
    Ok(Json(db::list_attributes(&state.db).await?))
}

/// POST /attributes
///
/// 201 for a new attribute, 200 when the name already exists.
pub async fn create_attribute(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<NameRequest>,
) -> Result<(StatusCode, Json<Attribute>), ApiError> {
    let name = request.name.unwrap_or_default();
    let (attribute, created) = db::create_attribute(&state.db, &name).await?;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(attribute)))
}
