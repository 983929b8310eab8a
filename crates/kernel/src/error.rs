//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::api::{ApiError, ErrorCategory};

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("upstream API error: {0}")]
    Api(#[from] ApiError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Api(e) => match e.category() {
                ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
                ErrorCategory::NotFound => StatusCode::NOT_FOUND,
                ErrorCategory::Validation => StatusCode::BAD_REQUEST,
                ErrorCategory::Network => StatusCode::GATEWAY_TIMEOUT,
                ErrorCategory::Server | ErrorCategory::Failed => StatusCode::BAD_GATEWAY,
            },
        };

        let body = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                ErrorResponse {
                    error: "internal server error".to_string(),
                    message: None,
                }
            }
            AppError::Api(e) => {
                tracing::warn!(error = %e, "upstream API error");
                ErrorResponse {
                    error: self.to_string(),
                    message: Some(e.notice().message),
                }
            }
            _ => ErrorResponse {
                error: self.to_string(),
                message: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
