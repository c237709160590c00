//! DB Repository abstractions

use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{Sender, StoredMessage};
use crate::infrastructure::traits::MessageRepository;
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, injectable};

#[injectable(MessageRepository)]
pub struct DbMessageRepository {
    connection: Ref<DatabaseConnection>,
}

#[async_trait]
impl MessageRepository for DbMessageRepository {
    async fn load_history(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<StoredMessage>, sqlx::Error> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.unwrap_or(-1);

        let mut rows: Vec<StoredMessage> = sqlx::query_as(
            "SELECT id, session_id, sender, text, timestamp FROM messages WHERE session_id = ? ORDER BY datetime(timestamp) DESC, id DESC LIMIT ?",
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&**self.connection)
        .await?;

        // Fetched newest-first; callers want chronological order.
        rows.reverse();
        Ok(rows)
    }

    async fn append_turn(
        &self,
        session_id: &str,
        user_text: &str,
        reply_text: &str,
    ) -> Result<(), sqlx::Error> {
        // Same timestamp for both rows; the monotonic id keeps the user
        // message ahead of the reply.
        let now = Utc::now();
        let mut tx = self.connection.begin().await?;

        sqlx::query("INSERT INTO messages (session_id, sender, text, timestamp) VALUES (?, ?, ?, ?)")
            .bind(session_id)
            .bind(Sender::User)
            .bind(user_text)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO messages (session_id, sender, text, timestamp) VALUES (?, ?, ?, ?)")
            .bind(session_id)
            .bind(Sender::Ai)
            .bind(reply_text)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn clear_session(&self, session_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM messages WHERE session_id = ?")
            .bind(session_id)
            .execute(&**self.connection)
            .await?;

        Ok(result.rows_affected())
    }
}
