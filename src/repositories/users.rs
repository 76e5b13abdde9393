use sqlx::PgPool;

use super::{is_unique_violation, RepositoryError};
use crate::models::users::{User, UserRole, UserUpdate};

#[derive(Clone)]
pub struct UserRepository {
    conn: PgPool,
}

impl UserRepository {
    pub fn new(conn: PgPool) -> Self {
        UserRepository { conn }
    }

    pub async fn insert_user(
        &self,
        id: &str,
        name: &str,
        phone: &str,
        password_hash: &str,
        pin_hash: &str,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, phone, password_hash, pin_hash, role)
            VALUES ($1, $2, $3, $4, $5, 'USER')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .bind(pin_hash)
        .fetch_one(&self.conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::Duplicate
            } else {
                RepositoryError::Sqlx(e)
            }
        })?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(user)
    }

    pub async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.conn)
            .await?;

        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.conn)
            .await?;

        Ok(users)
    }

    pub async fn update_user(
        &self,
        user_id: &str,
        update: &UserUpdate,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($1, name),
                balance_in_cents = COALESCE($2, balance_in_cents),
                drive_balance_in_cents = COALESCE($3, drive_balance_in_cents),
                is_blocked = COALESCE($4, is_blocked),
                role = COALESCE($5, role),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(update.name.as_deref())
        .bind(update.balance_in_cents)
        .bind(update.drive_balance_in_cents)
        .bind(update.is_blocked)
        .bind(update.role)
        .bind(user_id)
        .fetch_optional(&self.conn)
        .await?;

        user.ok_or(RepositoryError::NotFound)
    }

    /// Creates the bootstrap admin account unless the phone is already taken.
    pub async fn ensure_admin(
        &self,
        id: &str,
        name: &str,
        phone: &str,
        password_hash: &str,
        pin_hash: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, phone, password_hash, pin_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (phone) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .bind(pin_hash)
        .bind(UserRole::Admin)
        .fetch_optional(&self.conn)
        .await?;

        Ok(user)
    }
}
