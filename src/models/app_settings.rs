use serde::{Deserialize, Serialize};

/// Singleton row read by every request screen: one collection number per
/// mobile-money rail plus the dashboard banner rotation.
#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct AppSettings {
    pub bkash_number: String,
    pub nagad_number: String,
    pub rocket_number: String,
    pub banners: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppSettingsUpdate {
    pub bkash_number: Option<String>,
    pub nagad_number: Option<String>,
    pub rocket_number: Option<String>,
    pub banners: Option<Vec<String>>,
}
