use sqlx::PgPool;
use uuid::Uuid;

use super::RepositoryError;
use crate::models::offers::{NewOffer, Offer};

#[derive(Clone)]
pub struct OfferRepository {
    conn: PgPool,
}

impl OfferRepository {
    pub fn new(conn: PgPool) -> Self {
        OfferRepository { conn }
    }

    pub async fn list_offers(&self) -> Result<Vec<Offer>, RepositoryError> {
        let offers = sqlx::query_as::<_, Offer>("SELECT * FROM offers ORDER BY created_at ASC")
            .fetch_all(&self.conn)
            .await?;

        Ok(offers)
    }

    pub async fn insert_offer(&self, offer: &NewOffer) -> Result<Offer, RepositoryError> {
        let offer_id = Uuid::new_v4().hyphenated().to_string();

        let offer = sqlx::query_as::<_, Offer>(
            r#"
            INSERT INTO offers
            (id, kind, operator, title, price_in_cents, regular_price_in_cents, validity, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&offer_id)
        .bind(offer.kind)
        .bind(&offer.operator)
        .bind(&offer.title)
        .bind(offer.price_in_cents)
        .bind(offer.regular_price_in_cents)
        .bind(&offer.validity)
        .bind(offer.description.as_deref())
        .fetch_one(&self.conn)
        .await?;

        Ok(offer)
    }

    pub async fn delete_offer(&self, id: &str) -> Result<(), RepositoryError> {
        let deleted = sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(&self.conn)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
