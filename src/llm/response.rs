// src/llm/response.rs
// OpenAI-compatible chat response parsing

use serde::Deserialize;

use crate::error::{Result, ShadowError};

/// Non-streaming chat response (OpenAI-compatible format)
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseChoice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Extract the first choice's text. A missing or empty reply is `EmptyCompletion`.
pub fn parse_chat_response(response_body: &str) -> Result<String> {
    let data: ChatResponse = serde_json::from_str(response_body)?;

    data.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or(ShadowError::EmptyCompletion)
}
