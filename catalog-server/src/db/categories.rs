//! Category queries

use catalog_common::db::Category;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::error::ApiError;

pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>, ApiError> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(categories)
}

pub async fn create_category(pool: &SqlitePool, name: &str) -> Result<Category, ApiError> {
    let mut conn = pool.acquire().await?;
    insert_category(&mut conn, name).await
}

pub async fn insert_category(conn: &mut SqliteConnection, name: &str) -> Result<Category, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Category name is required".to_string()));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name) VALUES (?) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;

    info!(category_id = category.id, "Created category {:?}", category.name);
    Ok(category)
}

pub async fn get_category(conn: &mut SqliteConnection, id: i64) -> Result<Option<Category>, ApiError> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(category)
}

/// Validation error unless the category exists
pub async fn ensure_category(conn: &mut SqliteConnection, id: i64) -> Result<(), ApiError> {
    match get_category(conn, id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::Validation(format!("Unknown category: {}", id))),
    }
}
