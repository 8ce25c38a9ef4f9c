//! Router assembly.

mod catalog;
mod common;

pub use catalog::catalog_routes;
pub use common::common_routes;

use crate::response::failure;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, http::StatusCode, response::Response, Router};
use tower_http::trace::TraceLayer;

/// Maximum request body size, checked by the body extractors.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

async fn not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "Not Found", None)
}

/// Full application: common and catalog routes, enveloped 404 fallback, body limit, HTTP tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(catalog_routes(state))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http())
}
