// src/models.rs
// Persistent entities: users, conversations, messages, training samples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ShadowError;

/// Identity issued by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Author of a stored message. No other value exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ShadowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(ShadowError::InvalidRequest(format!(
                "unknown message role '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub mirror_mode: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSample {
    pub id: String,
    pub user_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The two columns the orchestrator reads from a training sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSnippet {
    pub content: String,
    pub category: Option<String>,
}

/// The two columns the orchestrator reads from a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

/// Samples needed before the shadow counts as fully trained
pub const TRAINING_TARGET: i64 = 10;

/// Aggregate counts shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub training_data_count: i64,
    pub conversation_count: i64,
    pub message_count: i64,
    /// Percent of `TRAINING_TARGET` reached, capped at 100
    pub training_progress: i64,
    pub samples_remaining: i64,
}

impl DashboardStats {
    pub fn new(training_data_count: i64, conversation_count: i64, message_count: i64) -> Self {
        let training = training_data_count.max(0);
        Self {
            training_data_count,
            conversation_count,
            message_count,
            training_progress: (training * 100 / TRAINING_TARGET).min(100),
            samples_remaining: (TRAINING_TARGET - training).max(0),
        }
    }
}
