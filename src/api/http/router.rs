// src/api/http/router.rs
// HTTP router composition

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    chat::chat_with_shadow,
    conversations::{
        create_conversation, get_conversation, list_messages, send_turn, update_conversation,
    },
    handlers::{health_handler, sign_out},
    training::{dashboard_stats, submit_training},
};
use crate::state::AppState;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

pub fn http_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_handler))
        // Orchestrator endpoint, also under the functions path existing clients call
        .route("/chat-with-shadow", post(chat_with_shadow))
        .route("/functions/v1/chat-with-shadow", post(chat_with_shadow))
        // Conversations
        .route("/conversations", post(create_conversation))
        .route(
            "/conversations/{id}",
            get(get_conversation).patch(update_conversation),
        )
        .route("/conversations/{id}/messages", get(list_messages))
        .route("/conversations/{id}/turn", post(send_turn))
        // Training and dashboard
        .route("/training", post(submit_training))
        .route("/stats", get(dashboard_stats))
        .route("/auth/sign-out", post(sign_out))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
