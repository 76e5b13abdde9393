pub mod app_settings;
pub mod catalog;
pub mod chat;
pub mod offers;
pub mod transactions;
pub mod users;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("row not found")]
    NotFound,
    #[error("duplicate value for a unique column")]
    Duplicate,
    #[error("request is no longer pending")]
    AlreadySettled,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
