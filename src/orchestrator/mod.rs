//! Prompt orchestrator - turns one user utterance into one assistant reply
//!
//! Reads the user's training samples and the conversation history, renders
//! the persona prompt picked by the mirror-mode flag, and forwards everything
//! to the chat gateway. It never writes: persisting both sides of the turn is
//! the caller's job. It never retries: gateway failures surface as typed errors.

use std::sync::Arc;
use tracing::{Span, info, instrument};

use crate::auth::AuthProvider;
use crate::config::DEFAULT_CONTEXT_LIMIT;
use crate::error::{Result, ShadowError};
use crate::llm::{ChatGateway, ChatMessage};
use crate::models::User;
use crate::persona::Persona;
use crate::prompt::{build_messages, build_system_prompt};
use crate::store::ShadowStore;

/// How much stored context goes into a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    pub training: u32,
    pub history: u32,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            training: DEFAULT_CONTEXT_LIMIT,
            history: DEFAULT_CONTEXT_LIMIT,
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn ShadowStore>,
    auth: Arc<dyn AuthProvider>,
    gateway: Arc<dyn ChatGateway>,
    limits: ContextLimits,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn ShadowStore>,
        auth: Arc<dyn AuthProvider>,
        gateway: Arc<dyn ChatGateway>,
    ) -> Self {
        Self {
            store,
            auth,
            gateway,
            limits: ContextLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.auth
    }

    pub fn store(&self) -> &Arc<dyn ShadowStore> {
        &self.store
    }

    /// Resolve a bearer token, failing with `Unauthorized` when it does not map to a user
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        self.auth.resolve(token).await?.ok_or(ShadowError::Unauthorized)
    }

    /// Full request path: authenticate the credential, then generate
    pub async fn generate_reply(
        &self,
        token: &str,
        conversation_id: &str,
        mirror_mode: bool,
        new_message: &str,
    ) -> Result<String> {
        let user = self.authenticate(token).await?;
        let persona = Persona::from_mirror_mode(mirror_mode);
        self.reply_for_user(&user, conversation_id, persona, new_message)
            .await
    }

    /// Generate for an already-resolved user. The conversation id is not
    /// validated: an unknown id, or one the user does not own, simply
    /// contributes no history.
    #[instrument(
        skip(self, user, new_message),
        fields(user_id = %user.id, persona = %persona, message_len = new_message.len(), history_len)
    )]
    pub async fn reply_for_user(
        &self,
        user: &User,
        conversation_id: &str,
        persona: Persona,
        new_message: &str,
    ) -> Result<String> {
        if new_message.trim().is_empty() {
            return Err(ShadowError::InvalidRequest("message must not be empty".to_string()));
        }

        let messages = self
            .assemble(user, conversation_id, persona, new_message)
            .await?;
        Span::current().record("history_len", messages.len().saturating_sub(2));

        info!("Calling LLM gateway");
        self.gateway.complete(messages).await
    }

    /// Fetch both context sources concurrently and build the gateway message list
    pub async fn assemble(
        &self,
        user: &User,
        conversation_id: &str,
        persona: Persona,
        new_message: &str,
    ) -> Result<Vec<ChatMessage>> {
        let (training, history) = futures::future::try_join(
            self.store.recent_training(&user.id, self.limits.training),
            self.store
                .recent_messages(&user.id, conversation_id, self.limits.history),
        )
        .await?;

        let system_prompt = build_system_prompt(persona, &training);
        Ok(build_messages(system_prompt, history, new_message))
    }
}
