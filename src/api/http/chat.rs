// src/api/http/chat.rs
// POST /chat-with-shadow: one orchestrated reply, nothing persisted

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use std::sync::Arc;
use tracing::{error, info};

use super::request_token;
use crate::api::error::{ApiError, ApiResult};
use crate::api::types::{ChatReply, ChatRequest};
use crate::error::ShadowError;
use crate::state::AppState;

/// Every failure other than rate limiting and quota exhaustion is a 500,
/// including a missing credential or an unreadable body.
pub async fn chat_with_shadow(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatReply>> {
    let Json(request) = payload.map_err(|rejection| {
        error!(error = %rejection, "Unreadable chat request body");
        ApiError::internal(rejection.body_text())
    })?;

    info!(
        conversation_id = %request.conversation_id,
        mirror_mode = request.mirror_mode,
        message_len = request.message.len(),
        "Chat request received"
    );

    let token = request_token(&headers).unwrap_or_default();
    let result = if token.is_empty() {
        Err(ShadowError::Unauthorized)
    } else {
        app_state
            .orchestrator
            .generate_reply(
                token,
                &request.conversation_id,
                request.mirror_mode,
                &request.message,
            )
            .await
    };

    match result {
        Ok(response) => Ok(Json(ChatReply { response })),
        Err(e) => {
            error!(conversation_id = %request.conversation_id, error = %e, "Error in chat-with-shadow");
            Err(ApiError::from_chat_failure(e))
        }
    }
}
