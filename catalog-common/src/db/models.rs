//! Database models
//!
//! Row types map one-to-one onto the catalog tables. JSON field names are
//! camelCase to match the HTTP contract.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attribute {
    pub id: i64,
    pub name: String,
}

/// Row of the `products` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category_id: i64,
}

/// Row of `product_attributes` joined with the attribute name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttribute {
    #[serde(skip)]
    pub product_id: i64,
    pub attribute_id: i64,
    pub name: String,
    pub value: String,
}
