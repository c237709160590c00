//! Implementations for the services the app needs.
//!

use crate::core::assistant::{ChatMessage, Mode, PromptSet, outbound_user_text};
use crate::core::error::ChatError;
use crate::core::traits::{ChatService, GenerativeBackend, TurnRequest, TurnReply};
use crate::infrastructure::traits::MessageRepository;
use async_trait::async_trait;
use di::{Ref, inject, injectable};
use log::{error, info};

/// How many of the most recent turns are supplied as context to the
/// generation call. A turn is a user message plus its reply, so the store is
/// asked for twice this many rows.
pub const HISTORY_WINDOW_TURNS: i64 = 5;

pub struct MyChatService {
    repo: Ref<dyn MessageRepository>,
    backend: Ref<dyn GenerativeBackend>,
    prompts: PromptSet,
}

#[injectable(ChatService)]
impl MyChatService {
    #[inject]
    pub fn create(
        repo: Ref<dyn MessageRepository>,
        backend: Ref<dyn GenerativeBackend>,
    ) -> MyChatService {
        MyChatService {
            repo,
            backend,
            prompts: PromptSet::from_env(),
        }
    }
}

#[async_trait]
impl ChatService for MyChatService {
    async fn complete_turn(&self, request: TurnRequest) -> Result<TurnReply, ChatError> {
        let mode: Mode = request.mode.parse()?;

        let history: Vec<ChatMessage> = self
            .repo
            .load_history(&request.session_id, Some(HISTORY_WINDOW_TURNS * 2))
            .await?
            .into_iter()
            .map(ChatMessage::from)
            .collect();

        let user_text = outbound_user_text(mode, request.give_answer_requested, &request.message);
        let instruction = self.prompts.template_for(mode);

        let response = self
            .backend
            .generate(instruction, &history, &user_text)
            .await
            .map_err(|e| {
                error!("generation failed for session {}: {e}", request.session_id);
                e
            })?;

        // The augmented text is the one persisted: it is what the model saw,
        // and what future turns should see as prior context.
        self.repo
            .append_turn(&request.session_id, &user_text, &response)
            .await?;

        info!(
            "completed {} turn for session {}",
            mode.as_str(),
            request.session_id
        );

        Ok(TurnReply { response, mode })
    }

    async fn clear_session(&self, session_id: &str) -> Result<(), ChatError> {
        let deleted = self.repo.clear_session(session_id).await?;
        info!("cleared {deleted} messages for session {session_id}");
        Ok(())
    }
}
