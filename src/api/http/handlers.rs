// src/api/http/handlers.rs

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;

use super::open_session;
use crate::api::error::ApiResult;
use crate::state::AppState;

/// Health check handler
pub async fn health_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": app_state.model,
    }))
}

pub async fn sign_out(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let session = open_session(&app_state, &headers).await?;
    session.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}
