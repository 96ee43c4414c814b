// src/api/http/mod.rs

use axum::http::{HeaderMap, header};

use crate::auth::bearer_token;
use crate::error::{Result, ShadowError};
use crate::session::ShadowSession;
use crate::state::AppState;

mod chat;
mod conversations;
mod handlers;
mod router;
mod training;

pub use chat::chat_with_shadow;
pub use conversations::{
    create_conversation, get_conversation, list_messages, send_turn, update_conversation,
};
pub use handlers::{health_handler, sign_out};
pub use router::http_router;
pub use training::{dashboard_stats, submit_training};

/// Bearer token from the `Authorization` header, if any
pub(crate) fn request_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
}

/// Authenticate the request and open a session for it
pub(crate) async fn open_session(state: &AppState, headers: &HeaderMap) -> Result<ShadowSession> {
    let token = request_token(headers).ok_or(ShadowError::Unauthorized)?;
    ShadowSession::open(state.orchestrator.clone(), token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(request_token(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(request_token(&headers), None);
    }
}
