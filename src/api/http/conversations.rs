// src/api/http/conversations.rs

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

use super::open_session;
use crate::api::error::ApiResult;
use crate::api::types::{
    CreateConversationRequest, TurnRequest, TurnResponse, UpdateConversationRequest,
};
use crate::models::{Conversation, Message};
use crate::state::AppState;

pub async fn create_conversation(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CreateConversationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Conversation>)> {
    let session = open_session(&app_state, &headers).await?;
    let Json(request) = payload?;
    let conversation = session
        .start_conversation(request.title.as_deref(), request.mirror_mode)
        .await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn get_conversation(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<Conversation>> {
    let session = open_session(&app_state, &headers).await?;
    Ok(Json(session.conversation(&conversation_id).await?))
}

pub async fn update_conversation(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(conversation_id): Path<String>,
    payload: Result<Json<UpdateConversationRequest>, JsonRejection>,
) -> ApiResult<Json<Conversation>> {
    let session = open_session(&app_state, &headers).await?;
    let Json(request) = payload?;
    let conversation = session
        .set_mirror_mode(&conversation_id, request.mirror_mode)
        .await?;
    Ok(Json(conversation))
}

pub async fn list_messages(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<Vec<Message>>> {
    let session = open_session(&app_state, &headers).await?;
    Ok(Json(session.history(&conversation_id).await?))
}

pub async fn send_turn(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(conversation_id): Path<String>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> ApiResult<Json<TurnResponse>> {
    let session = open_session(&app_state, &headers).await?;
    let Json(request) = payload?;
    let turn = session.send(&conversation_id, &request.message).await?;
    Ok(Json(turn.into()))
}
