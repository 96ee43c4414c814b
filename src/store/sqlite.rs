// src/store/sqlite.rs
// SQLite implementation of ShadowStore

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use super::ShadowStore;
use super::db::{now_timestamp, parse_timestamp};
use crate::error::Result;
use crate::models::{
    Conversation, DashboardStats, HistoryTurn, Message, Role, TrainingSample, TrainingSnippet,
};

#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: String,
    user_id: String,
    title: String,
    mirror_mode: bool,
    created_at: String,
}

impl ConversationRow {
    fn into_model(self) -> Result<Conversation> {
        Ok(Conversation {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            mirror_mode: self.mirror_mode,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn into_model(self) -> Result<Message> {
        Ok(Message {
            id: self.id,
            conversation_id: self.conversation_id,
            role: self.role.parse()?,
            content: self.content,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShadowStore for SqliteStore {
    async fn recent_training(&self, user_id: &str, limit: u32) -> Result<Vec<TrainingSnippet>> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            "SELECT content, category FROM shadow_training
             WHERE user_id = ?
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(content, category)| TrainingSnippet { content, category })
            .collect())
    }

    async fn recent_messages(
        &self,
        user_id: &str,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<HistoryTurn>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT m.role, m.content FROM messages m
             INNER JOIN conversations c ON c.id = m.conversation_id
             WHERE m.conversation_id = ? AND c.user_id = ?
             ORDER BY m.created_at ASC, m.rowid ASC
             LIMIT ?",
        )
        .bind(conversation_id)
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(role, content)| {
                Ok(HistoryTurn {
                    role: role.parse()?,
                    content,
                })
            })
            .collect()
    }

    async fn create_conversation(
        &self,
        user_id: &str,
        title: &str,
        mirror_mode: bool,
    ) -> Result<Conversation> {
        let row: ConversationRow = sqlx::query_as(
            "INSERT INTO conversations (id, user_id, title, mirror_mode, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, user_id, title, mirror_mode, created_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(title)
        .bind(mirror_mode)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await?;

        debug!(conversation_id = %row.id, user_id, "conversation created");
        row.into_model()
    }

    async fn get_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> Result<Option<Conversation>> {
        let row: Option<ConversationRow> = sqlx::query_as(
            "SELECT id, user_id, title, mirror_mode, created_at FROM conversations
             WHERE id = ? AND user_id = ?",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ConversationRow::into_model).transpose()
    }

    async fn set_mirror_mode(
        &self,
        user_id: &str,
        conversation_id: &str,
        mirror_mode: bool,
    ) -> Result<Option<Conversation>> {
        let row: Option<ConversationRow> = sqlx::query_as(
            "UPDATE conversations SET mirror_mode = ?
             WHERE id = ? AND user_id = ?
             RETURNING id, user_id, title, mirror_mode, created_at",
        )
        .bind(mirror_mode)
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ConversationRow::into_model).transpose()
    }

    async fn insert_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
    ) -> Result<Message> {
        let row: MessageRow = sqlx::query_as(
            "INSERT INTO messages (id, conversation_id, role, content, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, conversation_id, role, content, created_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(conversation_id)
        .bind(role.as_str())
        .bind(content)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await?;

        row.into_model()
    }

    async fn list_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, conversation_id, role, content, created_at FROM messages
             WHERE conversation_id = ?
             ORDER BY created_at ASC, rowid ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MessageRow::into_model).collect()
    }

    async fn insert_training(
        &self,
        user_id: &str,
        content: &str,
        category: Option<&str>,
    ) -> Result<TrainingSample> {
        let id = Uuid::new_v4().to_string();
        let created_at = now_timestamp();

        sqlx::query(
            "INSERT INTO shadow_training (id, user_id, content, category, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(content)
        .bind(category)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(TrainingSample {
            id,
            user_id: user_id.to_string(),
            content: content.to_string(),
            category: category.map(str::to_string),
            created_at: parse_timestamp(&created_at)?,
        })
    }

    async fn stats(&self, user_id: &str) -> Result<DashboardStats> {
        let (training_data_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM shadow_training WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let (conversation_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM conversations WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let (message_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages m
             INNER JOIN conversations c ON c.id = m.conversation_id
             WHERE c.user_id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats::new(
            training_data_count,
            conversation_count,
            message_count,
        ))
    }
}
