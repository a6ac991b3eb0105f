//! Tests for database initialization
//!
//! - Database file is created on first run (including parent directories)
//! - Opening an existing database is idempotent
//! - Catalog tables, indexes and constraints exist

use catalog_common::db::init::{init_database, init_memory_database};
use catalog_common::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use sqlx::SqlitePool;

async fn table_names(pool: &SqlitePool) -> Vec<String> {
    sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("catalog.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO categories (name) VALUES ('Garden')")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&pool2.unwrap())
        .await
        .unwrap();
    assert_eq!(count, 1, "Existing rows must survive a restart");
}

#[tokio::test]
async fn test_catalog_tables_created() {
    let pool = init_memory_database().await.unwrap();
    let tables = table_names(&pool).await;

    for expected in ["attributes", "categories", "product_attributes", "products", "schema_version"] {
        assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
    }

    assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
}

#[tokio::test]
async fn test_attribute_names_unique() {
    let pool = init_memory_database().await.unwrap();

    sqlx::query("INSERT INTO attributes (name) VALUES ('Size')")
        .execute(&pool)
        .await
        .unwrap();
    let duplicate = sqlx::query("INSERT INTO attributes (name) VALUES ('Size')")
        .execute(&pool)
        .await;

    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_one_assignment_per_attribute() {
    let pool = init_memory_database().await.unwrap();

    sqlx::query("INSERT INTO categories (id, name) VALUES (1, 'Clothing')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO attributes (id, name) VALUES (1, 'Size')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO products (id, name, price, category_id) VALUES (1, 'Shirt', 10.0, 1)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO product_attributes (product_id, attribute_id, value) VALUES (1, 1, 'L')")
        .execute(&pool)
        .await
        .unwrap();

    let duplicate = sqlx::query(
        "INSERT INTO product_attributes (product_id, attribute_id, value) VALUES (1, 1, 'M')",
    )
    .execute(&pool)
    .await;

    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_product_requires_existing_category() {
    let pool = init_memory_database().await.unwrap();

    let orphan = sqlx::query("INSERT INTO products (name, price, category_id) VALUES ('Ghost', 1.0, 42)")
        .execute(&pool)
        .await;

    assert!(orphan.is_err(), "foreign keys must be enforced");
}
