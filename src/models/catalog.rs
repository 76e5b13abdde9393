use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Tutorial {
    pub id: String,
    pub title: String,
    pub video_url: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTutorial {
    pub title: String,
    pub video_url: String,
}

/// Per-service kill switch plus the verification flag the dashboard shows.
#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct ServiceStatus {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub requires_verification: bool,
}
