use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Admin,
    SubAdmin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn can_review(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SubAdmin)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub pin_hash: String,
    pub role: UserRole,
    pub balance_in_cents: i64,
    pub drive_balance_in_cents: i64,
    pub is_blocked: bool,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub pin: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    pub phone: String,
    pub password: String,
}

/// Partial update applied from the admin user-management screen.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub balance_in_cents: Option<i64>,
    pub drive_balance_in_cents: Option<i64>,
    pub is_blocked: Option<bool>,
    pub role: Option<UserRole>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.balance_in_cents.is_none()
            && self.drive_balance_in_cents.is_none()
            && self.is_blocked.is_none()
            && self.role.is_none()
    }
}
