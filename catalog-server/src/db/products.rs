//! Product queries
//!
//! Reads return [`ProductDetail`]: the product row with its category, its
//! attribute assignments and the flattened `attributesString`. Every write
//! runs in a single transaction so the product row and its assignments change
//! together or not at all.

use std::collections::HashMap;

use catalog_common::db::{with_transaction, Category, Product, ProductAttribute};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::db::attributes::ensure_attributes;
use crate::db::categories::{ensure_category, get_category};
use crate::error::ApiError;
use crate::filter::ProductFilter;
use crate::reconcile::{dedup_last_wins, reconcile, AttributeValue};

/// Product ids per attribute lookup, well under SQLite's bound-variable limit
const ASSIGNMENT_BATCH_SIZE: usize = 900;

/// Body of `POST /products` and `PUT /products/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub category_id: i64,
    #[serde(default)]
    pub description: Option<String>,
    /// Full attribute list; on update this replaces the stored set
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
}

impl ProductInput {
    /// Field checks that need no database access
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("Product name is required".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ApiError::Validation(format!(
                "Price must be a non-negative number, got {}",
                self.price
            )));
        }
        Ok(())
    }

    fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    fn attribute_ids(&self) -> Vec<i64> {
        dedup_last_wins(&self.attributes)
            .iter()
            .map(|a| a.attribute_id)
            .collect()
    }
}

/// Product as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
    pub attributes: Vec<ProductAttribute>,
    /// `"Name: value"` pairs joined by `"; "`
    pub attributes_string: String,
}

impl ProductDetail {
    fn new(product: Product, category: Category, attributes: Vec<ProductAttribute>) -> Self {
        let attributes_string = attributes_string(&attributes);
        Self {
            product,
            category,
            attributes,
            attributes_string,
        }
    }
}

pub fn attributes_string(attributes: &[ProductAttribute]) -> String {
    attributes
        .iter()
        .map(|a| format!("{}: {}", a.name, a.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// GET /products backing query
pub async fn list_products(
    pool: &SqlitePool,
    filter: &ProductFilter,
) -> Result<Vec<ProductDetail>, ApiError> {
    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
        "SELECT p.id, p.name, p.price, p.description, p.category_id FROM products p",
    );
    filter.push_where(&mut qb);
    filter.push_order_by(&mut qb);

    let products: Vec<Product> = qb.build_query_as().fetch_all(pool).await?;
    debug!(
        count = products.len(),
        unfiltered = filter.is_unfiltered(),
        "Listed products"
    );
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let categories: HashMap<i64, Category> =
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories")
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

    let product_ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let mut assignments: HashMap<i64, Vec<ProductAttribute>> = HashMap::new();
    for batch in product_ids.chunks(ASSIGNMENT_BATCH_SIZE) {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT pa.product_id, pa.attribute_id, a.name, pa.value \
             FROM product_attributes pa JOIN attributes a ON a.id = pa.attribute_id \
             WHERE pa.product_id IN (",
        );
        let mut ids = qb.separated(", ");
        for id in batch {
            ids.push_bind(*id);
        }
        qb.push(") ORDER BY pa.product_id, a.name");

        for row in qb.build_query_as::<ProductAttribute>().fetch_all(pool).await? {
            assignments.entry(row.product_id).or_default().push(row);
        }
    }

    products
        .into_iter()
        .map(|product| {
            let category = categories.get(&product.category_id).cloned().ok_or_else(|| {
                ApiError::Internal(format!(
                    "Product {} references missing category {}",
                    product.id, product.category_id
                ))
            })?;
            let attributes = assignments.remove(&product.id).unwrap_or_default();
            Ok(ProductDetail::new(product, category, attributes))
        })
        .collect()
}

/// Attribute assignments of one product, ordered by attribute name
pub async fn attribute_assignments(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<Vec<ProductAttribute>, ApiError> {
    let rows = sqlx::query_as::<_, ProductAttribute>(
        "SELECT pa.product_id, pa.attribute_id, a.name, pa.value \
         FROM product_attributes pa JOIN attributes a ON a.id = pa.attribute_id \
         WHERE pa.product_id = ? ORDER BY a.name",
    )
    .bind(product_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

pub async fn get_product(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<ProductDetail>, ApiError> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, price, description, category_id FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(product) = product else {
        return Ok(None);
    };

    let category = get_category(conn, product.category_id).await?.ok_or_else(|| {
        ApiError::Internal(format!(
            "Product {} references missing category {}",
            product.id, product.category_id
        ))
    })?;
    let attributes = attribute_assignments(conn, id).await?;

    Ok(Some(ProductDetail::new(product, category, attributes)))
}

pub async fn create_product(pool: &SqlitePool, input: ProductInput) -> Result<ProductDetail, ApiError> {
    with_transaction(pool, "products::create", |conn| {
        Box::pin(async move { insert_product(conn, &input).await })
    })
    .await
}

/// Insert a product and its assignments on a connection the caller owns
///
/// Callers run this inside a transaction so a rejected assignment leaves no
/// product row behind.
pub async fn insert_product(
    conn: &mut SqliteConnection,
    input: &ProductInput,
) -> Result<ProductDetail, ApiError> {
    input.validate()?;
    ensure_category(conn, input.category_id).await?;
    ensure_attributes(conn, &input.attribute_ids()).await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (name, price, description, category_id) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(input.name.trim())
    .bind(input.price)
    .bind(input.description())
    .bind(input.category_id)
    .fetch_one(&mut *conn)
    .await?;

    let attributes = dedup_last_wins(&input.attributes);
    for attr in &attributes {
        insert_assignment(conn, id, attr).await?;
    }

    info!(product_id = id, attributes = attributes.len(), "Created product");
    load_written(conn, id).await
}

/// Update product fields and reconcile its attribute assignments
pub async fn update_product(
    pool: &SqlitePool,
    id: i64,
    input: ProductInput,
) -> Result<ProductDetail, ApiError> {
    input.validate()?;

    with_transaction(pool, "products::update", |conn| {
        Box::pin(async move {
            ensure_product(conn, id).await?;
            ensure_category(conn, input.category_id).await?;
            ensure_attributes(conn, &input.attribute_ids()).await?;

            sqlx::query(
                "UPDATE products SET name = ?, price = ?, description = ?, category_id = ? \
                 WHERE id = ?",
            )
            .bind(input.name.trim())
            .bind(input.price)
            .bind(input.description())
            .bind(input.category_id)
            .bind(id)
            .execute(&mut *conn)
            .await?;

            let current: Vec<AttributeValue> = attribute_assignments(conn, id)
                .await?
                .into_iter()
                .map(|a| AttributeValue::new(a.attribute_id, a.value))
                .collect();
            let diff = reconcile(&current, &input.attributes);

            for attr in &diff.to_add {
                insert_assignment(conn, id, attr).await?;
            }

            for attr in &diff.to_update {
                sqlx::query(
                    "UPDATE product_attributes SET value = ? WHERE product_id = ? AND attribute_id = ?",
                )
                .bind(&attr.value)
                .bind(id)
                .bind(attr.attribute_id)
                .execute(&mut *conn)
                .await?;
            }

            for attribute_id in &diff.to_remove {
                sqlx::query("DELETE FROM product_attributes WHERE product_id = ? AND attribute_id = ?")
                    .bind(id)
                    .bind(attribute_id)
                    .execute(&mut *conn)
                    .await?;
            }

            info!(
                product_id = id,
                added = diff.to_add.len(),
                updated = diff.to_update.len(),
                removed = diff.to_remove.len(),
                "Updated product"
            );
            load_written(conn, id).await
        })
    })
    .await
}

/// Delete a product and its attribute assignments
pub async fn delete_product(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
    with_transaction(pool, "products::delete", |conn| {
        Box::pin(async move {
            ensure_product(conn, id).await?;

            let removed = sqlx::query("DELETE FROM product_attributes WHERE product_id = ?")
                .bind(id)
                .execute(&mut *conn)
                .await?
                .rows_affected();

            sqlx::query("DELETE FROM products WHERE id = ?")
                .bind(id)
                .execute(&mut *conn)
                .await?;

            info!(product_id = id, assignments = removed, "Deleted product");
            Ok(())
        })
    })
    .await
}

async fn ensure_product(conn: &mut SqliteConnection, id: i64) -> Result<(), ApiError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = ?)")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("Product {} not found", id)))
    }
}

async fn insert_assignment(
    conn: &mut SqliteConnection,
    product_id: i64,
    attr: &AttributeValue,
) -> Result<(), ApiError> {
    sqlx::query("INSERT INTO product_attributes (product_id, attribute_id, value) VALUES (?, ?, ?)")
        .bind(product_id)
        .bind(attr.attribute_id)
        .bind(&attr.value)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

async fn load_written(conn: &mut SqliteConnection, id: i64) -> Result<ProductDetail, ApiError> {
    get_product(conn, id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("Product {} vanished after write", id)))
}
