// src/api/types.rs
// Request and response bodies (camelCase on the wire)

use serde::{Deserialize, Serialize};

use crate::models::Message;
use crate::session::ChatTurn;

/// Body of the chat-with-shadow call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: String,
    #[serde(default)]
    pub mirror_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mirror_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConversationRequest {
    pub mirror_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub user_message: Message,
    pub assistant_message: Message,
}

impl From<ChatTurn> for TurnResponse {
    fn from(turn: ChatTurn) -> Self {
        Self {
            user_message: turn.user_message,
            assistant_message: turn.assistant_message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRequest {
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
}
