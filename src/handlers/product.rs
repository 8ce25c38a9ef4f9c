//! Product endpoints.

use super::params::{parse_id, product_list_params};
use crate::error::{AppError, Entity};
use crate::extractors::JsonBody;
use crate::response::success;
use crate::schema::{ProductCreate, ProductUpdate, RequestValidator, PRODUCT_FIELDS};
use crate::service::ProductService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

#[utoipa::path(
    post,
    path = "/products/",
    tag = "products",
    request_body = ProductCreate,
    responses(
        (status = 200, description = "Product Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<impl IntoResponse, AppError> {
    let input: ProductCreate = RequestValidator::parse(body, PRODUCT_FIELDS)?;
    let mut session = state.store.session().await?;
    let product = ProductService::create(session.as_mut(), &input).await?;
    session.commit().await?;
    Ok(success("Product Created", product))
}

#[utoipa::path(
    get,
    path = "/products/{product_id}",
    tag = "products",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product Retrieved"),
        (status = 404, description = "Product Not Found")
    )
)]
pub async fn read(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str, "product_id")?;
    let mut session = state.store.session().await?;
    let product = ProductService::get(session.as_mut(), id)
        .await?
        .ok_or(AppError::NotFound(Entity::Product))?;
    session.commit().await?;
    Ok(success("Product Retrieved", product))
}

#[utoipa::path(
    put,
    path = "/products/{product_id}",
    tag = "products",
    params(("product_id" = i32, Path, description = "Product id")),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Product Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Product Not Found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str, "product_id")?;
    let patch: ProductUpdate = RequestValidator::parse_partial(body, PRODUCT_FIELDS)?;
    let mut session = state.store.session().await?;
    let product = ProductService::update(session.as_mut(), id, &patch)
        .await?
        .ok_or(AppError::NotFound(Entity::Product))?;
    session.commit().await?;
    Ok(success("Product Updated", product))
}

#[utoipa::path(
    delete,
    path = "/products/{product_id}",
    tag = "products",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product Deleted"),
        (status = 404, description = "Product Not Found")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str, "product_id")?;
    let mut session = state.store.session().await?;
    let product = ProductService::delete(session.as_mut(), id)
        .await?
        .ok_or(AppError::NotFound(Entity::Product))?;
    session.commit().await?;
    Ok(success("Product Deleted", product))
}

#[utoipa::path(
    get,
    path = "/products/",
    tag = "products",
    params(
        ("page_number" = Option<u32>, Query, description = "1-based page, default 1"),
        ("page_size" = Option<u32>, Query, description = "Items per page, default 10, at most 100"),
        ("search_term" = Option<String>, Query, description = "Case-insensitive match on name or description"),
        ("category_id" = Option<i32>, Query, description = "Only products in this category")
    ),
    responses(
        (status = 200, description = "Products Retrieved"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let (filter, page) = product_list_params(&params)?;
    let mut session = state.store.session().await?;
    let products = ProductService::list(session.as_mut(), &filter, page).await?;
    session.commit().await?;
    Ok(success("Products Retrieved", products))
}
