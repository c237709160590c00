//! Conversation message types, prompt modes and templates.
//!

use crate::core::error::ChatError;
use crate::infrastructure::entities;
use std::env;
use std::str::FromStr;

/// Directive appended to the user's message when an explicit answer is
/// requested in reflection mode.
pub const GIVE_ANSWER_DIRECTIVE: &str =
    " [User explicitly requested the answer. Please provide it directly now, followed by the thinking steps.]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A role-tagged message, the unit of conversation context sent downstream.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl From<entities::StoredMessage> for ChatMessage {
    fn from(m: entities::StoredMessage) -> Self {
        Self {
            content: m.text,
            role: match m.sender {
                entities::Sender::User => Role::User,
                entities::Sender::Ai => Role::Assistant,
            },
        }
    }
}

/// Which of the two instruction templates governs a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Reflection,
    Answer,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Reflection => "reflection",
            Mode::Answer => "answer",
        }
    }
}

impl FromStr for Mode {
    type Err = ChatError;

    /// Mode matching is case-insensitive; anything but the two known modes is
    /// rejected as a client error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reflection" => Ok(Mode::Reflection),
            "answer" => Ok(Mode::Answer),
            other => Err(ChatError::InvalidMode(other.to_owned())),
        }
    }
}

/// Builds the user text actually sent downstream (and persisted - the
/// augmented text is what future turns see as prior context).
pub fn outbound_user_text(mode: Mode, give_answer_requested: bool, message: &str) -> String {
    if mode == Mode::Reflection && give_answer_requested {
        format!("{message}{GIVE_ANSWER_DIRECTIVE}")
    } else {
        message.to_owned()
    }
}

/// The two fixed instruction templates, sourced from the environment.
pub struct PromptSet {
    reflection: String,
    answer: String,
}

impl PromptSet {
    pub fn from_env() -> PromptSet {
        dotenvy::dotenv().ok();
        PromptSet {
            reflection: env::var("REFLECTION_PROMPT_TEMPLATE")
                .expect("REFLECTION_PROMPT_TEMPLATE must be set"),
            answer: env::var("ANSWER_PROMPT_TEMPLATE")
                .expect("ANSWER_PROMPT_TEMPLATE must be set"),
        }
    }

    pub fn new(reflection: String, answer: String) -> PromptSet {
        PromptSet { reflection, answer }
    }

    pub fn template_for(&self, mode: Mode) -> &str {
        match mode {
            Mode::Reflection => &self.reflection,
            Mode::Answer => &self.answer,
        }
    }
}
