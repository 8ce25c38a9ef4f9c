//! Category and product routes. Collection paths answer with and without the trailing slash.

use crate::handlers::{category, product};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(category::list).post(category::create))
        .route("/categories/", get(category::list).post(category::create))
        .route(
            "/categories/:id",
            get(category::read).put(category::update).delete(category::delete),
        )
        .route("/products", get(product::list).post(product::create))
        .route("/products/", get(product::list).post(product::create))
        .route(
            "/products/:id",
            get(product::read).put(product::update).delete(product::delete),
        )
        .with_state(state)
}
