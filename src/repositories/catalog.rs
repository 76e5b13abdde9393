use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryError;
use crate::models::catalog::{NewTutorial, ServiceStatus, Tutorial};

#[derive(Clone)]
pub struct CatalogRepository {
    conn: PgPool,
}

impl CatalogRepository {
    pub fn new(conn: PgPool) -> Self {
        CatalogRepository { conn }
    }

    pub async fn list_services(&self) -> Result<Vec<ServiceStatus>, RepositoryError> {
        let services =
            sqlx::query_as::<_, ServiceStatus>("SELECT * FROM service_status ORDER BY name ASC")
                .fetch_all(&self.conn)
                .await?;

        Ok(services)
    }

    pub async fn get_service(&self, id: &str) -> Result<Option<ServiceStatus>, RepositoryError> {
        let service =
            sqlx::query_as::<_, ServiceStatus>("SELECT * FROM service_status WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.conn)
                .await?;

        Ok(service)
    }

    pub async fn toggle_service(&self, id: &str) -> Result<ServiceStatus, RepositoryError> {
        let service = sqlx::query_as::<_, ServiceStatus>(
            "UPDATE service_status SET is_active = NOT is_active WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.conn)
        .await?;

        service.ok_or(RepositoryError::NotFound)
    }

    pub async fn list_tutorials(&self) -> Result<Vec<Tutorial>, RepositoryError> {
        let tutorials =
            sqlx::query_as::<_, Tutorial>("SELECT * FROM tutorials ORDER BY created_at ASC")
                .fetch_all(&self.conn)
                .await?;

        Ok(tutorials)
    }

    pub async fn insert_tutorial(&self, tutorial: &NewTutorial) -> Result<Tutorial, RepositoryError> {
        let tutorial_id = Uuid::new_v4().hyphenated().to_string();

        let tutorial = sqlx::query_as::<_, Tutorial>(
            "INSERT INTO tutorials (id, title, video_url) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&tutorial_id)
        .bind(&tutorial.title)
        .bind(&tutorial.video_url)
        .fetch_one(&self.conn)
        .await?;

        Ok(tutorial)
    }

    pub async fn delete_tutorial(&self, id: &str) -> Result<(), RepositoryError> {
        let deleted = sqlx::query("DELETE FROM tutorials WHERE id = $1")
            .bind(id)
            .execute(&self.conn)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
