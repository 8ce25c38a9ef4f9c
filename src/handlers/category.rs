//! Category endpoints. Each handler owns one storage session for its whole run.

use super::params::{category_list_params, parse_id};
use crate::error::{AppError, Entity};
use crate::extractors::JsonBody;
use crate::response::success;
use crate::schema::{CategoryCreate, CategoryUpdate, RequestValidator, CATEGORY_FIELDS};
use crate::service::CategoryService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

#[utoipa::path(
    post,
    path = "/categories/",
    tag = "categories",
    request_body = CategoryCreate,
    responses(
        (status = 200, description = "Category Created"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody) -> Result<impl IntoResponse, AppError> {
    let input: CategoryCreate = RequestValidator::parse(body, CATEGORY_FIELDS)?;
    let mut session = state.store.session().await?;
    let category = CategoryService::create(session.as_mut(), &input).await?;
    session.commit().await?;
    Ok(success("Category Created", category))
}

#[utoipa::path(
    get,
    path = "/categories/{category_id}",
    tag = "categories",
    params(("category_id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category Retrieved"),
        (status = 404, description = "Category Not Found")
    )
)]
pub async fn read(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str, "category_id")?;
    let mut session = state.store.session().await?;
    let category = CategoryService::get(session.as_mut(), id)
        .await?
        .ok_or(AppError::NotFound(Entity::Category))?;
    session.commit().await?;
    Ok(success("Category Retrieved", category))
}

#[utoipa::path(
    put,
    path = "/categories/{category_id}",
    tag = "categories",
    params(("category_id" = i32, Path, description = "Category id")),
    request_body = CategoryUpdate,
    responses(
        (status = 200, description = "Category Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Category Not Found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str, "category_id")?;
    let patch: CategoryUpdate = RequestValidator::parse_partial(body, CATEGORY_FIELDS)?;
    let mut session = state.store.session().await?;
    let category = CategoryService::update(session.as_mut(), id, &patch)
        .await?
        .ok_or(AppError::NotFound(Entity::Category))?;
    session.commit().await?;
    Ok(success("Category Updated", category))
}

#[utoipa::path(
    delete,
    path = "/categories/{category_id}",
    tag = "categories",
    params(("category_id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category Deleted"),
        (status = 404, description = "Category Not Found"),
        (status = 409, description = "Category Has Products")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str, "category_id")?;
    let mut session = state.store.session().await?;
    let category = CategoryService::delete(session.as_mut(), id)
        .await?
        .ok_or(AppError::NotFound(Entity::Category))?;
    session.commit().await?;
    Ok(success("Category Deleted", category))
}

#[utoipa::path(
    get,
    path = "/categories/",
    tag = "categories",
    params(
        ("page_number" = Option<u32>, Query, description = "1-based page, default 1"),
        ("page_size" = Option<u32>, Query, description = "Items per page, default 10, at most 100"),
        ("search_term" = Option<String>, Query, description = "Case-insensitive match on name or description")
    ),
    responses(
        (status = 200, description = "Categories Retrieved"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let (filter, page) = category_list_params(&params)?;
    let mut session = state.store.session().await?;
    let categories = CategoryService::list(session.as_mut(), &filter, page).await?;
    session.commit().await?;
    Ok(success("Categories Retrieved", categories))
}
