// src/session.rs
// Signed-in session: the explicit context a client threads through every chat action

use tracing::{info, warn};

use crate::error::{Result, ShadowError};
use crate::models::{Conversation, DashboardStats, Message, Role, TrainingSample, User};
use crate::orchestrator::Orchestrator;
use crate::persona::Persona;
use crate::store::DEFAULT_CONVERSATION_TITLE;

/// Both halves of a completed chat turn, as stored
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub user_message: Message,
    pub assistant_message: Message,
}

/// Obtained once per sign-in and passed to whatever needs it. `sign_out`
/// consumes the session, so a torn-down session cannot be reused.
pub struct ShadowSession {
    orchestrator: Orchestrator,
    user: User,
    token: String,
}

impl ShadowSession {
    pub async fn open(orchestrator: Orchestrator, token: &str) -> Result<Self> {
        let user = orchestrator.authenticate(token).await?;
        Ok(Self {
            orchestrator,
            user,
            token: token.to_string(),
        })
    }

    async fn owned_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        self.orchestrator
            .store()
            .get_conversation(&self.user.id, conversation_id)
            .await?
            .ok_or_else(|| ShadowError::NotFound(format!("conversation {conversation_id}")))
    }

    pub async fn start_conversation(
        &self,
        title: Option<&str>,
        mirror_mode: bool,
    ) -> Result<Conversation> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CONVERSATION_TITLE);
        self.orchestrator
            .store()
            .create_conversation(&self.user.id, title, mirror_mode)
            .await
    }

    pub async fn conversation(&self, conversation_id: &str) -> Result<Conversation> {
        self.owned_conversation(conversation_id).await
    }

    pub async fn history(&self, conversation_id: &str) -> Result<Vec<Message>> {
        self.owned_conversation(conversation_id).await?;
        self.orchestrator.store().list_messages(conversation_id).await
    }

    /// Flip the flag for future turns. Stored messages are untouched.
    pub async fn set_mirror_mode(
        &self,
        conversation_id: &str,
        mirror_mode: bool,
    ) -> Result<Conversation> {
        self.orchestrator
            .store()
            .set_mirror_mode(&self.user.id, conversation_id, mirror_mode)
            .await?
            .ok_or_else(|| ShadowError::NotFound(format!("conversation {conversation_id}")))
    }

    /// Persist the user message, generate with the conversation's current
    /// flag, then persist the reply. On a generation failure the user message
    /// stays stored and the error is returned.
    pub async fn send(&self, conversation_id: &str, text: &str) -> Result<ChatTurn> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ShadowError::InvalidRequest("message must not be empty".to_string()));
        }

        let conversation = self.owned_conversation(conversation_id).await?;
        let store = self.orchestrator.store();

        let user_message = store.insert_message(conversation_id, Role::User, text).await?;

        // History is read after the insert, so the new message is both the
        // last history entry and the final user turn.
        let persona = Persona::from_mirror_mode(conversation.mirror_mode);
        let reply = match self
            .orchestrator
            .reply_for_user(&self.user, conversation_id, persona, text)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(conversation_id, error = %e, "chat turn failed after user message was stored");
                return Err(e);
            }
        };

        let assistant_message = store
            .insert_message(conversation_id, Role::Assistant, &reply)
            .await?;

        Ok(ChatTurn {
            user_message,
            assistant_message,
        })
    }

    pub async fn submit_training(
        &self,
        content: &str,
        category: Option<&str>,
    ) -> Result<TrainingSample> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ShadowError::InvalidRequest(
                "training content must not be empty".to_string(),
            ));
        }
        let category = category.map(str::trim).filter(|c| !c.is_empty());

        self.orchestrator
            .store()
            .insert_training(&self.user.id, content, category)
            .await
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        self.orchestrator.store().stats(&self.user.id).await
    }

    pub async fn sign_out(self) -> Result<()> {
        self.orchestrator.auth().revoke(&self.token).await?;
        info!(user_id = %self.user.id, "signed out");
        Ok(())
    }
}
