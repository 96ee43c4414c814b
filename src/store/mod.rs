// src/store/mod.rs
// Relational store for conversations, messages and training samples

pub mod db;
mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Conversation, DashboardStats, HistoryTurn, Message, Role, TrainingSample, TrainingSnippet};

pub const DEFAULT_CONVERSATION_TITLE: &str = "New Conversation";

/// Query/insert interface over the store.
///
/// Per-user isolation lives here: every conversation lookup takes the owning
/// user id and treats another user's row as absent.
#[async_trait]
pub trait ShadowStore: Send + Sync {
    /// Up to `limit` most recent samples for the user, newest-first
    async fn recent_training(&self, user_id: &str, limit: u32) -> Result<Vec<TrainingSnippet>>;

    /// The first `limit` messages of the user's conversation, oldest-first.
    /// An unknown conversation, or one owned by someone else, yields an empty list.
    async fn recent_messages(
        &self,
        user_id: &str,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<HistoryTurn>>;

    async fn create_conversation(
        &self,
        user_id: &str,
        title: &str,
        mirror_mode: bool,
    ) -> Result<Conversation>;

    async fn get_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<Option<Conversation>>;

    /// Returns the updated conversation, or `None` if the user does not own it
    async fn set_mirror_mode(
        &self,
        user_id: &str,
        conversation_id: &str,
        mirror_mode: bool,
    ) -> Result<Option<Conversation>>;

    async fn insert_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
    ) -> Result<Message>;

    /// Every message of the conversation, oldest-first
    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>>;

    async fn insert_training(
        &self,
        user_id: &str,
        content: &str,
        category: Option<&str>,
    ) -> Result<TrainingSample>;

    async fn stats(&self, user_id: &str) -> Result<DashboardStats>;
}
