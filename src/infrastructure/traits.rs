//! Infrastructure traits, used for DI on higher levels

use crate::infrastructure::entities::StoredMessage;
use async_trait::async_trait;

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Loads the most recent `limit` messages for a session, oldest first.
    ///
    /// `None` loads the full history. An unknown session yields an empty list.
    async fn load_history(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<StoredMessage>, sqlx::Error>;

    /// Persists one complete turn (user message and its reply) in a single
    /// transaction, so a reader never sees a user row without its reply.
    async fn append_turn(
        &self,
        session_id: &str,
        user_text: &str,
        reply_text: &str,
    ) -> Result<(), sqlx::Error>;

    /// Deletes every message of the session. Returns the number of deleted
    /// rows; deleting a session that does not exist is not an error.
    async fn clear_session(&self, session_id: &str) -> Result<u64, sqlx::Error>;
}
