//! Typed errors and HTTP mapping.

use crate::response::failure;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// One failing constraint on a request field. `field` is the bare body field name, or
/// `query.<name>` / `path.<name>` for URL parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub error: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            error: error.into(),
        }
    }
}

/// Entities exposed by the API; used to word not-found responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Category,
    Product,
}

impl Entity {
    pub fn name(self) -> &'static str {
        match self {
            Entity::Category => "Category",
            Entity::Product => "Product",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),
    #[error("{} not found", .0.name())]
    NotFound(Entity),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure on a single field.
    pub fn field(field: impl Into<String>, error: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, error)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Validation(errors) => failure(status, "Validation Error", Some(errors)),
            AppError::NotFound(entity) => failure(status, format!("{} Not Found", entity.name()), None),
            AppError::PayloadTooLarge => failure(status, "Payload Too Large", None),
            AppError::Conflict(message) => failure(status, message, None),
            other => {
                tracing::error!(error = %other, "request failed");
                failure(status, "Internal Server Error", None)
            }
        }
    }
}
