//! Standard response envelope: `{status, message, data, error}` on every endpoint.

use crate::error::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub message: String,
    pub data: Option<T>,
    pub error: Option<Vec<FieldError>>,
}

pub fn envelope<T: Serialize>(
    status: Status,
    message: impl Into<String>,
    data: Option<T>,
    error: Option<Vec<FieldError>>,
) -> Envelope<T> {
    Envelope {
        status,
        message: message.into(),
        data,
        error,
    }
}

pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(envelope(Status::Success, message, Some(data), None)))
}

pub fn failure(status: StatusCode, message: impl Into<String>, error: Option<Vec<FieldError>>) -> Response {
    (
        status,
        Json(envelope::<()>(Status::Error, message, None, error)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_has_null_error() {
        let (status, Json(body)) = success("Category Retrieved", json!({"id": 1}));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "status": "success",
                "message": "Category Retrieved",
                "data": {"id": 1},
                "error": null
            })
        );
    }

    #[test]
    fn error_envelope_carries_field_errors() {
        let body = envelope::<()>(
            Status::Error,
            "Validation Error",
            None,
            Some(vec![FieldError::new("name", "field required")]),
        );
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "status": "error",
                "message": "Validation Error",
                "data": null,
                "error": [{"field": "name", "error": "field required"}]
            })
        );
    }
}
