// src/error.rs
// Error taxonomy shared by the orchestrator, store, auth and HTTP layers

use thiserror::Error;

/// Main error type for the ShadowMe library
#[derive(Error, Debug)]
pub enum ShadowError {
    /// The bearer credential did not resolve to a user
    #[error("Unauthorized")]
    Unauthorized,

    /// Gateway answered 429
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    /// Gateway answered 402
    #[error("AI usage quota exceeded. Please add credits to continue.")]
    QuotaExceeded,

    /// Any other non-success status from an upstream service
    #[error("AI API error: {0}")]
    UpstreamError(u16),

    /// Gateway succeeded but carried no reply text
    #[error("No response from AI")]
    EmptyCompletion,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Result using ShadowError
pub type Result<T> = std::result::Result<T, ShadowError>;

impl ShadowError {
    /// Whether a caller may retry the same request after a delay
    pub fn is_retryable(&self) -> bool {
        matches!(self, ShadowError::RateLimited)
    }

    /// Map a non-success gateway status onto the taxonomy
    pub fn from_gateway_status(status: u16) -> Self {
        match status {
            429 => ShadowError::RateLimited,
            402 => ShadowError::QuotaExceeded,
            other => ShadowError::UpstreamError(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_status_mapping() {
        assert!(matches!(
            ShadowError::from_gateway_status(429),
            ShadowError::RateLimited
        ));
        assert!(matches!(
            ShadowError::from_gateway_status(402),
            ShadowError::QuotaExceeded
        ));
        assert!(matches!(
            ShadowError::from_gateway_status(503),
            ShadowError::UpstreamError(503)
        ));
        assert!(matches!(
            ShadowError::from_gateway_status(400),
            ShadowError::UpstreamError(400)
        ));
    }

    #[test]
    fn test_user_facing_messages() {
        assert!(ShadowError::RateLimited
            .to_string()
            .starts_with("Rate limit exceeded"));
        assert!(ShadowError::QuotaExceeded
            .to_string()
            .contains("quota exceeded"));
        assert_eq!(ShadowError::UpstreamError(500).to_string(), "AI API error: 500");
        assert_eq!(ShadowError::EmptyCompletion.to_string(), "No response from AI");
        assert_eq!(ShadowError::Unauthorized.to_string(), "Unauthorized");
    }

    #[test]
    fn test_only_rate_limit_is_retryable() {
        assert!(ShadowError::RateLimited.is_retryable());
        assert!(!ShadowError::QuotaExceeded.is_retryable());
        assert!(!ShadowError::UpstreamError(500).is_retryable());
        assert!(!ShadowError::Unauthorized.is_retryable());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: ShadowError = json_err.into();
        assert!(matches!(err, ShadowError::Json(_)));
        assert!(err.to_string().contains("JSON"));
    }
}
