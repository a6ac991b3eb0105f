//! Demo data for an empty catalog
//!
//! Seeds two categories, three attributes and one product with three
//! attribute assignments in a single transaction. Does nothing once the
//! catalog holds any category or product.

use catalog_common::db::with_transaction;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::db::{insert_attribute, insert_category, insert_product, ProductInput};
use crate::error::ApiError;
use crate::reconcile::AttributeValue;

/// Returns true when data was inserted
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<bool, ApiError> {
    with_transaction(pool, "seed", |conn| {
        Box::pin(async move {
            let (categories, products) = catalog_size(conn).await?;
            if categories > 0 || products > 0 {
                info!(categories, products, "Catalog is not empty, skipping seed");
                return Ok(false);
            }

            insert_category(conn, "Electronics").await?;
            let clothing = insert_category(conn, "Clothing").await?;

            let (size, _) = insert_attribute(conn, "Size").await?;
            let (color, _) = insert_attribute(conn, "Color").await?;
            let (sale, _) = insert_attribute(conn, "Sale").await?;

            let t_shirt = ProductInput {
                name: "T-Shirt".to_string(),
                price: 19.99,
                category_id: clothing.id,
                description: Some("A comfortable cotton t-shirt".to_string()),
                attributes: vec![
                    AttributeValue::new(size.id, "L"),
                    AttributeValue::new(color.id, "blue"),
                    AttributeValue::new(sale.id, "yes"),
                ],
            };
            insert_product(conn, &t_shirt).await?;

            info!("✓ Seeded demo catalog");
            Ok(true)
        })
    })
    .await
}

async fn catalog_size(conn: &mut SqliteConnection) -> Result<(i64, i64), ApiError> {
    let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&mut *conn)
        .await?;
    let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&mut *conn)
        .await?;

    Ok((categories, products))
}
