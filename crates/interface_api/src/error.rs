//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_billing::BillingError;
use domain_filing::FilingError;
use domain_notify::NotifyError;
use domain_requests::RequestError;
use domain_review::ReviewError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        ApiError::Unauthorized
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<FilingError> for ApiError {
    fn from(err: FilingError) -> Self {
        match err {
            FilingError::ReturnNotFound(id) => ApiError::NotFound(format!("Return {id}")),
            FilingError::Validation(msg) => ApiError::Validation(msg),
            FilingError::Money(e) => ApiError::Validation(e.to_string()),
            FilingError::NotPermitted(msg) => ApiError::Forbidden(msg),
            FilingError::Storage(msg) => ApiError::Internal(msg),
            state => ApiError::Conflict(state.to_string()),
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::RequestNotFound(id) => ApiError::NotFound(format!("Info request {id}")),
            RequestError::Validation(msg) => ApiError::Validation(msg),
            RequestError::NotPermitted(msg) => ApiError::Forbidden(msg),
            RequestError::Storage(msg) => ApiError::Internal(msg),
            state => ApiError::Conflict(state.to_string()),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::BillNotFound(id) => ApiError::NotFound(format!("Bill {id}")),
            BillingError::Validation(msg) => ApiError::Validation(msg),
            BillingError::Money(e) => ApiError::Validation(e.to_string()),
            BillingError::NotPermitted(msg) => ApiError::Forbidden(msg),
            BillingError::Storage(msg) => ApiError::Internal(msg),
            state => ApiError::Conflict(state.to_string()),
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::ReturnNotFound(id) => ApiError::NotFound(format!("Return {id}")),
            ReviewError::NotPermitted(msg) => ApiError::Forbidden(msg),
            ReviewError::Storage(msg) => ApiError::Internal(msg),
            state => ApiError::Conflict(state.to_string()),
        }
    }
}

impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::NotificationNotFound(id) => {
                ApiError::NotFound(format!("Notification {id}"))
            }
            NotifyError::NotPermitted(msg) => ApiError::Forbidden(msg),
            NotifyError::Storage(msg) => ApiError::Internal(msg),
        }
    }
}
