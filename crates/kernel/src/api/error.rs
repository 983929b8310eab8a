//! Remote API errors and the notices shown for them.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Failure of a remote API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("server error ({0})")]
    Server(u16),

    #[error("request rejected ({0})")]
    Client(u16),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Rejected(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => ApiError::NotFound,
            StatusCode::REQUEST_TIMEOUT => ApiError::Timeout,
            s if s.is_server_error() => ApiError::Server(s.as_u16()),
            s => ApiError::Client(s.as_u16()),
        }
    }

    /// Classify a transport-level failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status)
        } else {
            ApiError::Network(err.to_string())
        }
    }

    /// Failures worth another attempt by a caller-level retry policy.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout)
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Network(_) | ApiError::Timeout => ErrorCategory::Network,
            ApiError::Server(_) => ErrorCategory::Server,
            ApiError::Forbidden => ErrorCategory::Forbidden,
            ApiError::NotFound => ErrorCategory::NotFound,
            ApiError::Validation(_) => ErrorCategory::Validation,
            ApiError::Client(_) | ApiError::Decode(_) | ApiError::Rejected(_) | ApiError::Url(_) => {
                ErrorCategory::Failed
            }
        }
    }

    /// The notification shown to the user for this error.
    pub fn notice(&self) -> Notice {
        let category = self.category();
        let message = match self {
            ApiError::Validation(message) => message.clone(),
            _ => category.message_key().to_string(),
        };
        Notice {
            level: match category {
                ErrorCategory::Validation => NoticeLevel::Warning,
                _ => NoticeLevel::Error,
            },
            category,
            message,
        }
    }
}

/// Coarse error classes used for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Network,
    Server,
    Forbidden,
    NotFound,
    Validation,
    Failed,
}

impl ErrorCategory {
    /// i18n key of the message shown for this category.
    pub fn message_key(self) -> &'static str {
        match self {
            ErrorCategory::Network => "errors.networkError",
            ErrorCategory::Server => "errors.serverError",
            ErrorCategory::Forbidden => "errors.noPermission",
            ErrorCategory::Validation => "errors.invalidInput",
            ErrorCategory::NotFound | ErrorCategory::Failed => "errors.fetchFailed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A transient notification for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub category: ErrorCategory,
    pub message: String,
}
