use serde::{Deserialize, Serialize};

/// One message in the two-party support thread. Messages from users carry no
/// recipient and are implicitly addressed to the admin desk; admin replies
/// name the user they answer.
#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: Option<String>,
    pub text: String,
    pub is_admin: bool,
    pub sent_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewChatMessage {
    pub sender_id: String,
    pub recipient_id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub is_admin: bool,
}
