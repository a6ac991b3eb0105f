//! # Catalog Common Library
//!
//! Shared code for the product catalog service:
//! - Error type used by the database layer
//! - Configuration resolution (CLI > environment > TOML > defaults)
//! - Database initialization, schema and migrations
//! - Row models for categories, attributes and products
//! - Transaction scope helper

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
