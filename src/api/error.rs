// src/api/error.rs
// HTTP error responses: every failure leaves as `{ "error": <message> }`

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::error::ShadowError;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::custom(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::custom(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::custom(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::custom(StatusCode::UNAUTHORIZED, message)
    }

    pub fn custom(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    /// The chat-with-shadow contract: 429 and 402 keep their status, every
    /// other failure (including `Unauthorized`) is a 500.
    pub fn from_chat_failure(err: ShadowError) -> Self {
        match err {
            ShadowError::RateLimited => {
                Self::custom(StatusCode::TOO_MANY_REQUESTS, err.to_string())
            }
            ShadowError::QuotaExceeded => {
                Self::custom(StatusCode::PAYMENT_REQUIRED, err.to_string())
            }
            other => Self::internal(public_message(&other)),
        }
    }
}

/// Taxonomy errors carry user-facing text; infrastructure errors are logged
/// and replaced with a generic message.
fn public_message(err: &ShadowError) -> String {
    match err {
        ShadowError::Database(_)
        | ShadowError::Migration(_)
        | ShadowError::Http(_)
        | ShadowError::Json(_)
        | ShadowError::Config(_) => {
            error!(error = %err, "internal failure");
            INTERNAL_MESSAGE.to_string()
        }
        other => other.to_string(),
    }
}

/// Status mapping for the data routes
impl From<ShadowError> for ApiError {
    fn from(err: ShadowError) -> Self {
        match err {
            ShadowError::Unauthorized => Self::unauthorized(err.to_string()),
            ShadowError::NotFound(_) => Self::not_found(err.to_string()),
            ShadowError::InvalidRequest(_) => Self::bad_request(err.to_string()),
            ShadowError::RateLimited | ShadowError::QuotaExceeded => Self::from_chat_failure(err),
            other => Self::internal(public_message(&other)),
        }
    }
}

/// Unreadable bodies on the data routes
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
