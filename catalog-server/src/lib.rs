//! catalog-server library - product catalog HTTP service
//!
//! Products belong to one category and carry a variable set of
//! attribute/value pairs. Listing supports search, price range, category and
//! attribute-name filters; updates reconcile the submitted attribute set
//! against the stored one inside a single transaction.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod filter;
pub mod reconcile;
pub mod seed;

pub use error::ApiError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let catalog = Router::new()
        .route(
            "/products",
            get(api::list_products).post(api::create_product),
        )
        .route(
            "/products/:id",
            get(api::get_product)
                .put(api::update_product)
                .delete(api::delete_product),
        )
        .route(
            "/attributes",
            get(api::list_attributes).post(api::create_attribute),
        )
        .route(
            "/categories",
            get(api::list_categories).post(api::create_category),
        );

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes());

    Router::new()
        .merge(catalog)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
