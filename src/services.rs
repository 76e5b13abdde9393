use async_trait::async_trait;
use rand::Rng;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::models::users::User;
use crate::repositories::users::UserRepository;
use crate::repositories::RepositoryError;
use crate::settings::Settings;

mod catalog;
mod chat;
mod http;
mod transactions;
mod users;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Repository failures that carry a domain meaning keep it; everything
    /// else degrades to a database error with the owning service named.
    fn repository(service: &str, err: RepositoryError) -> ServiceError {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound("Row not found.".to_string()),
            RepositoryError::Duplicate => {
                ServiceError::Conflict("A row with that value already exists.".to_string())
            }
            RepositoryError::AlreadySettled => {
                ServiceError::Conflict("Request is no longer pending.".to_string())
            }
            RepositoryError::Sqlx(e) => {
                ServiceError::Database(format!("{}: {}", service, e))
            }
        }
    }
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

/// Account ids follow the storefront scheme: "U" plus five digits.
pub(crate) fn new_account_id() -> String {
    format!("U{:05}", rand::thread_rng().gen_range(0..100_000))
}

pub(crate) async fn require_admin(
    users: &UserRepository,
    actor_id: &str,
) -> Result<User, ServiceError> {
    let actor = users
        .get_user_by_id(actor_id)
        .await
        .map_err(|e| ServiceError::repository("UserRepository", e))?
        .ok_or_else(|| ServiceError::Unauthorized("Unknown acting user.".to_string()))?;

    if !actor.role.is_admin() {
        return Err(ServiceError::Unauthorized(
            "Only an admin may perform this action.".to_string(),
        ));
    }

    Ok(actor)
}

pub(crate) async fn require_reviewer(
    users: &UserRepository,
    actor_id: &str,
) -> Result<User, ServiceError> {
    let actor = users
        .get_user_by_id(actor_id)
        .await
        .map_err(|e| ServiceError::repository("UserRepository", e))?
        .ok_or_else(|| ServiceError::Unauthorized("Unknown acting user.".to_string()))?;

    if !actor.role.can_review() {
        return Err(ServiceError::Unauthorized(
            "Only admin staff may perform this action.".to_string(),
        ));
    }

    Ok(actor)
}

async fn seed_admin(pool: &PgPool, settings: &Settings) -> Result<(), anyhow::Error> {
    let password_hash = bcrypt::hash(&settings.admin.password, bcrypt::DEFAULT_COST)?;
    let pin_hash = bcrypt::hash(&settings.admin.pin, bcrypt::DEFAULT_COST)?;

    let created = UserRepository::new(pool.clone())
        .ensure_admin(
            &new_account_id(),
            &settings.admin.name,
            &settings.admin.phone,
            &password_hash,
            &pin_hash,
        )
        .await?;

    if let Some(admin) = created {
        log::info!("Created bootstrap admin account {}.", admin.id);
    }

    Ok(())
}

pub async fn start_services(
    pool: PgPool,
    settings: Settings,
    listen: &str,
) -> Result<(), anyhow::Error> {
    seed_admin(&pool, &settings).await?;

    let (user_tx, mut user_rx) = mpsc::channel(512);
    let (transaction_tx, mut transaction_rx) = mpsc::channel(512);
    let (chat_tx, mut chat_rx) = mpsc::channel(512);
    let (catalog_tx, mut catalog_rx) = mpsc::channel(512);

    let mut user_service = users::UserService::new();
    let mut transaction_service = transactions::TransactionService::new();
    let mut chat_service = chat::ChatService::new();
    let mut catalog_service = catalog::CatalogService::new();

    log::info!("Starting user service.");
    let user_pool_clone = pool.clone();
    tokio::spawn(async move {
        user_service
            .run(users::UserRequestHandler::new(user_pool_clone), &mut user_rx)
            .await;
    });

    log::info!("Starting transaction service.");
    let transaction_pool_clone = pool.clone();
    tokio::spawn(async move {
        transaction_service
            .run(
                transactions::TransactionRequestHandler::new(transaction_pool_clone),
                &mut transaction_rx,
            )
            .await;
    });

    log::info!("Starting chat service.");
    let chat_pool_clone = pool.clone();
    tokio::spawn(async move {
        chat_service
            .run(chat::ChatRequestHandler::new(chat_pool_clone), &mut chat_rx)
            .await;
    });

    log::info!("Starting catalog service.");
    let catalog_pool_clone = pool.clone();
    tokio::spawn(async move {
        catalog_service
            .run(
                catalog::CatalogRequestHandler::new(catalog_pool_clone),
                &mut catalog_rx,
            )
            .await;
    });

    log::info!("Starting HTTP server.");
    http::start_http_server(listen, user_tx, transaction_tx, chat_tx, catalog_tx).await
}
