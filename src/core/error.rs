use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::modules::openai::UpstreamError;
use crate::modules::staging::StagingError;
use crate::shared::types::{ErrorResponse, FieldViolation, ValidationErrorResponse};

/// Message sent to clients for faults that must not leak internal detail
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Failure category attached to error responses so the status-mapping layer
/// can promote 500s to more specific codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    BadRequest,
    UpstreamNotFound,
    Upstream,
    Timeout,
    PayloadTooLarge,
    StagingIo,
    Unhandled,
}

impl ErrorKind {
    /// Status used when strict status codes are enabled
    pub fn strict_status(self) -> Option<StatusCode> {
        match self {
            ErrorKind::UpstreamNotFound => Some(StatusCode::NOT_FOUND),
            ErrorKind::PayloadTooLarge => Some(StatusCode::PAYLOAD_TOO_LARGE),
            ErrorKind::Timeout => Some(StatusCode::GATEWAY_TIMEOUT),
            _ => None,
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::Upstream(UpstreamError::Timeout(_)) => ErrorKind::Timeout,
            AppError::Upstream(e) if e.is_not_found() => ErrorKind::UpstreamNotFound,
            AppError::Upstream(_) => ErrorKind::Upstream,
            AppError::Staging(StagingError::PayloadTooLarge { .. }) => ErrorKind::PayloadTooLarge,
            AppError::Staging(StagingError::Io(_)) => ErrorKind::StagingIo,
            AppError::Internal(_) => ErrorKind::Unhandled,
        }
    }
}

/// Response for faults that escaped every handler (panics, internal errors)
pub fn unhandled_response() -> Response {
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: GENERIC_ERROR_MESSAGE.to_string(),
        }),
    )
        .into_response();
    response.extensions_mut().insert(ErrorKind::Unhandled);
    response
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();

        let mut response = match self {
            AppError::Validation(errors) => {
                tracing::error!(violations = ?errors, "Request validation failed");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationErrorResponse { errors }),
                )
                    .into_response()
            }
            AppError::BadRequest(message) => {
                tracing::error!("Bad request: {}", message);
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
            }
            AppError::Upstream(e) => {
                tracing::error!(error = ?e, "Upstream error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response()
            }
            AppError::Staging(e) => {
                tracing::error!(error = ?e, "Upload staging error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response()
            }
            AppError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                return unhandled_response();
            }
        };

        response.extensions_mut().insert(kind);
        response
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
