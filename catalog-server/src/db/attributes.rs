//! Attribute definition queries
//!
//! Attribute names are unique. Creating an attribute whose name already
//! exists returns the stored row instead of inserting a second one.

use catalog_common::db::Attribute;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::ApiError;

pub async fn list_attributes(pool: &SqlitePool) -> Result<Vec<Attribute>, ApiError> {
    let attributes = sqlx::query_as::<_, Attribute>("SELECT id, name FROM attributes ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(attributes)
}

/// Create an attribute by name
///
/// Returns the attribute and whether it was newly inserted.
pub async fn create_attribute(pool: &SqlitePool, name: &str) -> Result<(Attribute, bool), ApiError> {
    let mut conn = pool.acquire().await?;
    insert_attribute(&mut conn, name).await
}

/// Connection-level [`create_attribute`], usable inside a transaction
pub async fn insert_attribute(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<(Attribute, bool), ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Attribute name is required".to_string()));
    }

    let inserted = sqlx::query_as::<_, Attribute>(
        "INSERT INTO attributes (name) VALUES (?) ON CONFLICT(name) DO NOTHING RETURNING id, name",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(attribute) = inserted {
        info!(attribute_id = attribute.id, "Created attribute {:?}", attribute.name);
        return Ok((attribute, true));
    }

    let existing = sqlx::query_as::<_, Attribute>("SELECT id, name FROM attributes WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    debug!(attribute_id = existing.id, "Attribute {:?} already exists", existing.name);
    Ok((existing, false))
}

/// Validation error unless every id names an existing attribute
pub async fn ensure_attributes(conn: &mut SqliteConnection, ids: &[i64]) -> Result<(), ApiError> {
    for &id in ids {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM attributes WHERE id = ?)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        if !exists {
            return Err(ApiError::Validation(format!("Unknown attribute: {}", id)));
        }
    }

    Ok(())
}
