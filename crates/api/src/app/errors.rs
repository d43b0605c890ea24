use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use backoffice_auth::{GateError, StoreError};
use backoffice_core::DomainError;

/// Closed set of outcomes a handler can fail with.
///
/// Messages are fixed strings; detail stays in the logs.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid {0}")]
    Invalid(&'static str),

    #[error("request timed out")]
    Timeout,

    #[error("internal error")]
    Internal,
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Unauthenticated => Self::Unauthenticated,
            GateError::Forbidden => Self::Forbidden,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "directory query failed");
        Self::Internal
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidId(_) => Self::Invalid("id"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            Self::Unauthenticated => json_error(StatusCode::UNAUTHORIZED, "unauthenticated", message),
            Self::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", message),
            Self::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", message),
            Self::Invalid(_) => json_error(StatusCode::BAD_REQUEST, "invalid", message),
            Self::Timeout => json_error(StatusCode::GATEWAY_TIMEOUT, "timeout", message),
            Self::Internal => json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message),
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
