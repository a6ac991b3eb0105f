//! Database access layer for catalog-server
//!
//! Functions that may run inside a transaction take `&mut SqliteConnection`;
//! callers outside a transaction pass a pooled connection.

pub mod attributes;
pub mod categories;
pub mod products;

pub use attributes::{create_attribute, insert_attribute, list_attributes};
pub use categories::{create_category, insert_category, list_categories};
pub use products::{
    attribute_assignments, create_product, delete_product, get_product, insert_product,
    list_products, update_product, ProductDetail, ProductInput,
};
