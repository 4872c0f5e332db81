//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use datastore::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// Insert hit an existing row with the same key.
    Conflict(String),
    /// Stock validation rejected the submission.
    InsufficientStock { details: Vec<String> },
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg }))
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, serde_json::json!({ "error": msg })),
            ApiError::InsufficientStock { details } => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "Insufficient stock", "details": details }),
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": msg }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            StoreError::RowNotFound { .. } => ApiError::NotFound(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::InsufficientStock { details } => {
                ApiError::InsufficientStock { details }
            }
            CheckoutError::OrderNotFound(id) => ApiError::NotFound(format!("Order {id} not found")),
            CheckoutError::DuplicateOrder(id) => {
                ApiError::Conflict(format!("Order {id} already exists"))
            }
            CheckoutError::Store(store_err) => store_err.into(),
        }
    }
}
