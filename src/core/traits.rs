//! DI "Interfaces"

use crate::core::assistant::{ChatMessage, Mode};
use crate::core::error::{ChatError, GenerationError};
use async_trait::async_trait;

/// One inbound chat turn, exactly as the caller phrased it.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub session_id: String,
    pub message: String,
    pub mode: String,
    pub give_answer_requested: bool,
}

/// The generated reply plus the mode that was resolved for it.
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub response: String,
    pub mode: Mode,
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Runs one full turn: load history, build the prompt, generate a reply
    /// and persist both sides of the exchange.
    async fn complete_turn(&self, request: TurnRequest) -> Result<TurnReply, ChatError>;

    /// Forgets everything said in a session. Clearing an unknown session
    /// succeeds.
    async fn clear_session(&self, session_id: &str) -> Result<(), ChatError>;
}

/// Capability for producing a reply from an external text-generation service.
///
/// `instruction` is the fixed system instruction for the turn, `history` the
/// chronological conversation context, `user_text` the new (possibly
/// directive-augmented) user message.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(
        &self,
        instruction: &str,
        history: &[ChatMessage],
        user_text: &str,
    ) -> Result<String, GenerationError>;
}
