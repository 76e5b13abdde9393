use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferKind {
    Regular,
    Drive,
}

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Offer {
    pub id: String,
    pub kind: OfferKind,
    pub operator: String,
    pub title: String,
    pub price_in_cents: i64,
    pub regular_price_in_cents: i64,
    pub validity: String,
    pub description: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewOffer {
    pub kind: OfferKind,
    pub operator: String,
    pub title: String,
    pub price_in_cents: i64,
    pub regular_price_in_cents: i64,
    pub validity: String,
    pub description: Option<String>,
}
