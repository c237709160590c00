//! Error taxonomy for the chat core.

use thiserror::Error;

/// Failures surfaced by the chat service. The API layer maps each variant to
/// an HTTP status: `InvalidMode` is the caller's fault, `QuotaExceeded` asks
/// the caller to retry later, everything else is a server fault.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid mode specified: {0}")]
    InvalidMode(String),

    #[error("Generation quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("Error generating response: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Failures from a generative backend, before they reach the service
/// boundary. Backends classify quota exhaustion themselves since only they
/// can recognize the provider's marker for it.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("Generation failed: {0}")]
    Failed(String),
}

impl From<GenerationError> for ChatError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::QuotaExhausted(msg) => ChatError::QuotaExceeded(msg),
            GenerationError::Failed(msg) => ChatError::Upstream(msg),
        }
    }
}
