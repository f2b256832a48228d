use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use encore_derive::api_model;
use std::collections::BTreeMap;
use tracing::error;

/// JSON error payload returned by every endpoint.
#[api_model]
pub struct ErrorBody {
    /// Human readable message
    pub error: String,
    /// Field-level validation messages, keyed by field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

/// An HTTP error: a status code plus an [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: ErrorBody { error: message.into(), fields: None } }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>, fields: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorBody { error: message.into(), fields: Some(fields) },
        }
    }

    /// Hides the cause from the client; it is logged instead.
    pub fn internal(cause: &dyn std::error::Error) -> Self {
        error!(error = %cause, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<super::ApiStateError> for ApiError {
    fn from(err: super::ApiStateError) -> Self {
        Self::internal(&err)
    }
}
