use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryError;
use crate::models::chat::{ChatMessage, NewChatMessage};

#[derive(Clone)]
pub struct ChatRepository {
    conn: PgPool,
}

impl ChatRepository {
    pub fn new(conn: PgPool) -> Self {
        ChatRepository { conn }
    }

    pub async fn insert_message(
        &self,
        message: &NewChatMessage,
    ) -> Result<ChatMessage, RepositoryError> {
        let message_id = Uuid::new_v4().hyphenated().to_string();

        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (id, sender_id, recipient_id, text, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&message_id)
        .bind(&message.sender_id)
        .bind(message.recipient_id.as_deref())
        .bind(&message.text)
        .bind(message.is_admin)
        .fetch_one(&self.conn)
        .await?;

        Ok(message)
    }

    /// The per-user thread: everything the user sent plus every admin reply
    /// addressed to them, oldest first.
    pub async fn thread_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT * FROM chat_messages
            WHERE sender_id = $1 OR recipient_id = $1
            ORDER BY sent_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.conn)
        .await?;

        Ok(messages)
    }

    pub async fn list_all(&self) -> Result<Vec<ChatMessage>, RepositoryError> {
        let messages =
            sqlx::query_as::<_, ChatMessage>("SELECT * FROM chat_messages ORDER BY sent_at ASC")
                .fetch_all(&self.conn)
                .await?;

        Ok(messages)
    }
}
