use sqlx::PgPool;

use super::RepositoryError;
use crate::models::app_settings::{AppSettings, AppSettingsUpdate};

// The table holds exactly one row, seeded by migration.
const SINGLETON_ID: i32 = 1;

#[derive(Clone)]
pub struct AppSettingsRepository {
    conn: PgPool,
}

impl AppSettingsRepository {
    pub fn new(conn: PgPool) -> Self {
        AppSettingsRepository { conn }
    }

    pub async fn get_settings(&self) -> Result<AppSettings, RepositoryError> {
        let settings = sqlx::query_as::<_, AppSettings>(
            "SELECT bkash_number, nagad_number, rocket_number, banners FROM app_settings WHERE id = $1",
        )
        .bind(SINGLETON_ID)
        .fetch_one(&self.conn)
        .await?;

        Ok(settings)
    }

    pub async fn update_settings(
        &self,
        update: &AppSettingsUpdate,
    ) -> Result<AppSettings, RepositoryError> {
        let settings = sqlx::query_as::<_, AppSettings>(
            r#"
            UPDATE app_settings SET
                bkash_number = COALESCE($1, bkash_number),
                nagad_number = COALESCE($2, nagad_number),
                rocket_number = COALESCE($3, rocket_number),
                banners = COALESCE($4, banners)
            WHERE id = $5
            RETURNING bkash_number, nagad_number, rocket_number, banners
            "#,
        )
        .bind(update.bkash_number.as_deref())
        .bind(update.nagad_number.as_deref())
        .bind(update.rocket_number.as_deref())
        .bind(update.banners.as_deref())
        .bind(SINGLETON_ID)
        .fetch_one(&self.conn)
        .await?;

        Ok(settings)
    }
}
