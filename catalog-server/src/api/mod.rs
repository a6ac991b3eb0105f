//! HTTP API handlers for catalog-server

pub mod attributes;
pub mod categories;
pub mod extract;
pub mod health;
pub mod products;
pub mod ui;

pub use attributes::{create_attribute, list_attributes};
pub use categories::{create_category, list_categories};
pub use health::health_routes;
pub use products::{create_product, delete_product, get_product, list_products, update_product};
pub use ui::{serve_app_js, serve_index};
