//! Database entities

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Who wrote a message. Stored as TEXT, `user` or `ai`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One row of the append-only `messages` table. Never updated after insert.
#[derive(Debug, Clone, FromRow)]
pub struct StoredMessage {
    pub id: i64,
    pub session_id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
