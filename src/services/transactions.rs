use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{require_admin, require_reviewer};
use super::{RequestHandler, Service, ServiceError};
use crate::models::transactions::{ServiceRequest, Transaction, TransactionStatus};
use crate::repositories::catalog::CatalogRepository;
use crate::repositories::transactions::TransactionRepository;
use crate::repositories::users::UserRepository;
use crate::repositories::RepositoryError;

pub enum TransactionServiceRequest {
    SubmitRequest {
        request: ServiceRequest,
        response: oneshot::Sender<Result<Transaction, ServiceError>>,
    },
    Settle {
        actor_id: String,
        transaction_id: String,
        decision: TransactionStatus,
        response: oneshot::Sender<Result<Transaction, ServiceError>>,
    },
    GetTransaction {
        transaction_id: String,
        response: oneshot::Sender<Result<Option<Transaction>, ServiceError>>,
    },
    History {
        user_id: String,
        response: oneshot::Sender<Result<Vec<Transaction>, ServiceError>>,
    },
    ListAll {
        actor_id: String,
        response: oneshot::Sender<Result<Vec<Transaction>, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct TransactionRequestHandler {
    repository: TransactionRepository,
    users: UserRepository,
    catalog: CatalogRepository,
}

impl TransactionRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = TransactionRepository::new(sql_conn.clone());
        let users = UserRepository::new(sql_conn.clone());
        let catalog = CatalogRepository::new(sql_conn);

        TransactionRequestHandler {
            repository,
            users,
            catalog,
        }
    }

    async fn submit_request(&self, request: ServiceRequest) -> Result<Transaction, ServiceError> {
        if request.amount_in_cents <= 0 {
            return Err(ServiceError::Validation(
                "Amount must be positive.".to_string(),
            ));
        }

        let user = self
            .users
            .get_user_by_id(&request.user_id)
            .await
            .map_err(|e| ServiceError::repository("UserRepository", e))?
            .ok_or_else(|| ServiceError::NotFound("Account not found.".to_string()))?;

        if user.is_blocked {
            return Err(ServiceError::Unauthorized(
                "This account has been blocked.".to_string(),
            ));
        }

        if request.kind.requires_pin() {
            let pin = request.pin.as_deref().ok_or_else(|| {
                ServiceError::Validation("Transaction PIN is required.".to_string())
            })?;

            let matches = bcrypt::verify(pin, &user.pin_hash)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;

            if !matches {
                return Err(ServiceError::Unauthorized("Wrong PIN.".to_string()));
            }
        }

        // Service toggles without a row (deposits) are always on.
        let service = self
            .catalog
            .get_service(request.kind.service_key())
            .await
            .map_err(|e| ServiceError::repository("CatalogRepository", e))?;

        if let Some(service) = service {
            if !service.is_active {
                return Err(ServiceError::Validation(format!(
                    "{} is currently unavailable.",
                    service.name
                )));
            }
        }

        let transaction = self
            .repository
            .insert_request(
                &user.id,
                request.kind,
                request.amount_in_cents,
                &request.details(),
                request.operator.as_deref(),
            )
            .await
            .map_err(|e| ServiceError::repository("TransactionRepository", e))?;

        log::info!(
            "Request {} submitted by {} ({:?}, {} cents).",
            transaction.id,
            user.id,
            transaction.kind,
            transaction.amount_in_cents
        );

        Ok(transaction)
    }

    async fn settle(
        &self,
        actor_id: &str,
        transaction_id: &str,
        decision: TransactionStatus,
    ) -> Result<Transaction, ServiceError> {
        require_admin(&self.users, actor_id).await?;

        if !decision.is_terminal() {
            return Err(ServiceError::Validation(
                "A request can only be settled to SUCCESS or FAILED.".to_string(),
            ));
        }

        let transaction = self
            .repository
            .settle(transaction_id, decision)
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadySettled => ServiceError::Conflict(
                    "Request has already been settled.".to_string(),
                ),
                RepositoryError::NotFound => {
                    ServiceError::NotFound("Request or owning account not found.".to_string())
                }
                other => ServiceError::repository("TransactionRepository", other),
            })?;

        log::info!(
            "Request {} settled as {:?} by {}.",
            transaction.id,
            decision,
            actor_id
        );

        Ok(transaction)
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, ServiceError> {
        self.repository
            .get_transaction(transaction_id)
            .await
            .map_err(|e| ServiceError::repository("TransactionRepository", e))
    }

    async fn history(&self, user_id: &str) -> Result<Vec<Transaction>, ServiceError> {
        self.repository
            .list_for_user(user_id)
            .await
            .map_err(|e| ServiceError::repository("TransactionRepository", e))
    }

    async fn list_all(&self, actor_id: &str) -> Result<Vec<Transaction>, ServiceError> {
        require_reviewer(&self.users, actor_id).await?;

        self.repository
            .list_all()
            .await
            .map_err(|e| ServiceError::repository("TransactionRepository", e))
    }
}

#[async_trait]
impl RequestHandler<TransactionServiceRequest> for TransactionRequestHandler {
    async fn handle_request(&self, request: TransactionServiceRequest) {
        match request {
            TransactionServiceRequest::SubmitRequest { request, response } => {
                let result = self.submit_request(request).await;
                let _ = response.send(result);
            }
            TransactionServiceRequest::Settle {
                actor_id,
                transaction_id,
                decision,
                response,
            } => {
                let result = self.settle(&actor_id, &transaction_id, decision).await;
                let _ = response.send(result);
            }
            TransactionServiceRequest::GetTransaction {
                transaction_id,
                response,
            } => {
                let result = self.get_transaction(&transaction_id).await;
                let _ = response.send(result);
            }
            TransactionServiceRequest::History { user_id, response } => {
                let result = self.history(&user_id).await;
                let _ = response.send(result);
            }
            TransactionServiceRequest::ListAll { actor_id, response } => {
                let result = self.list_all(&actor_id).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct TransactionService;

impl TransactionService {
    pub fn new() -> Self {
        TransactionService {}
    }
}

#[async_trait]
impl Service<TransactionServiceRequest, TransactionRequestHandler> for TransactionService {}
