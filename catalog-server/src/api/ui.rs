//! Catalog page
//!
//! `GET /` returns the single-page product table (filters, sort controls and
//! the add/edit dialog); `GET /static/app.js` returns the script that drives
//! it through the JSON endpoints. Both files are compiled into the binary.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

const CATALOG_PAGE: &str = include_str!("../../ui/index.html");
const CATALOG_SCRIPT: &str = include_str!("../../ui/app.js");

pub async fn serve_index() -> Html<&'static str> {
    Html(CATALOG_PAGE)
}

pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        CATALOG_SCRIPT,
    )
        .into_response()
}
