// src/api/http/training.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

use super::open_session;
use crate::api::error::ApiResult;
use crate::api::types::TrainingRequest;
use crate::models::{DashboardStats, TrainingSample};
use crate::state::AppState;

pub async fn submit_training(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<TrainingRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TrainingSample>)> {
    let session = open_session(&app_state, &headers).await?;
    let Json(request) = payload?;
    let sample = session
        .submit_training(&request.content, request.category.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(sample)))
}

/// Counts shown on the dashboard
pub async fn dashboard_stats(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<DashboardStats>> {
    let session = open_session(&app_state, &headers).await?;
    Ok(Json(session.stats().await?))
}
