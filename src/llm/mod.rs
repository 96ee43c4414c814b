// src/llm/mod.rs
// Chat-completion gateway: wire types, the client trait, and the HTTP client

mod gateway;
mod request;
mod response;

pub use gateway::GatewayClient;
pub use request::ChatRequest;
pub use response::parse_chat_response;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{HistoryTurn, Role};

/// Role tag on a gateway message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl From<Role> for ChatRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => ChatRole::User,
            Role::Assistant => ChatRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<HistoryTurn> for ChatMessage {
    fn from(turn: HistoryTurn) -> Self {
        Self {
            role: turn.role.into(),
            content: turn.content,
        }
    }
}

/// Sampling parameters sent with every completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: crate::config::DEFAULT_MODEL.to_string(),
            temperature: crate::config::DEFAULT_TEMPERATURE,
            max_tokens: crate::config::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Anything that can turn an ordered message list into one reply.
///
/// Implementations map 429 to `RateLimited`, 402 to `QuotaExceeded`, any
/// other non-success status to `UpstreamError`, and a reply without text to
/// `EmptyCompletion`. They never retry.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_shape() {
        let json = serde_json::to_value(ChatMessage::system("be yourself")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "be yourself"}));
    }

    #[test]
    fn test_history_turn_keeps_role() {
        let msg: ChatMessage = HistoryTurn {
            role: Role::Assistant,
            content: "earlier reply".into(),
        }
        .into();
        assert_eq!(msg, ChatMessage::assistant("earlier reply"));
    }
}
