use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{new_account_id, require_admin, require_reviewer};
use super::{RequestHandler, Service, ServiceError};
use crate::models::users::{Credentials, NewUser, User, UserUpdate};
use crate::repositories::users::UserRepository;

pub enum UserRequest {
    Register {
        new_user: NewUser,
        response: oneshot::Sender<Result<User, ServiceError>>,
    },
    Login {
        credentials: Credentials,
        response: oneshot::Sender<Result<User, ServiceError>>,
    },
    GetUser {
        id: String,
        response: oneshot::Sender<Result<Option<User>, ServiceError>>,
    },
    ListUsers {
        actor_id: String,
        response: oneshot::Sender<Result<Vec<User>, ServiceError>>,
    },
    UpdateUser {
        actor_id: String,
        user_id: String,
        update: UserUpdate,
        response: oneshot::Sender<Result<User, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct UserRequestHandler {
    repository: UserRepository,
}

impl UserRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = UserRepository::new(sql_conn);

        UserRequestHandler { repository }
    }

    async fn register(&self, new_user: NewUser) -> Result<User, ServiceError> {
        if new_user.name.trim().is_empty()
            || new_user.phone.trim().is_empty()
            || new_user.password.is_empty()
            || new_user.pin.is_empty()
        {
            return Err(ServiceError::Validation(
                "Name, phone, password and PIN are all required.".to_string(),
            ));
        }

        if new_user.pin.len() < 4 {
            return Err(ServiceError::Validation(
                "Transaction PIN must be at least 4 digits.".to_string(),
            ));
        }

        let password_hash = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let pin_hash = bcrypt::hash(&new_user.pin, bcrypt::DEFAULT_COST)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let user = self
            .repository
            .insert_user(
                &new_account_id(),
                new_user.name.trim(),
                new_user.phone.trim(),
                &password_hash,
                &pin_hash,
            )
            .await
            .map_err(|e| match e {
                crate::repositories::RepositoryError::Duplicate => ServiceError::Conflict(
                    "An account with that phone number already exists.".to_string(),
                ),
                other => ServiceError::repository("UserRepository", other),
            })?;

        log::info!("Registered account {} ({}).", user.id, user.phone);

        Ok(user)
    }

    async fn login(&self, credentials: Credentials) -> Result<User, ServiceError> {
        let user = self
            .repository
            .get_user_by_phone(&credentials.phone)
            .await
            .map_err(|e| ServiceError::repository("UserRepository", e))?
            .ok_or_else(|| ServiceError::NotFound("Account not found.".to_string()))?;

        if user.is_blocked {
            return Err(ServiceError::Unauthorized(
                "This account has been blocked.".to_string(),
            ));
        }

        let matches = bcrypt::verify(&credentials.password, &user.password_hash)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        if !matches {
            return Err(ServiceError::Unauthorized("Wrong password.".to_string()));
        }

        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, ServiceError> {
        self.repository
            .get_user_by_id(id)
            .await
            .map_err(|e| ServiceError::repository("UserRepository", e))
    }

    async fn list_users(&self, actor_id: &str) -> Result<Vec<User>, ServiceError> {
        require_reviewer(&self.repository, actor_id).await?;

        self.repository
            .list_users()
            .await
            .map_err(|e| ServiceError::repository("UserRepository", e))
    }

    async fn update_user(
        &self,
        actor_id: &str,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<User, ServiceError> {
        require_admin(&self.repository, actor_id).await?;

        if update.is_empty() {
            return Err(ServiceError::Validation(
                "Nothing to update.".to_string(),
            ));
        }

        let user = self
            .repository
            .update_user(user_id, &update)
            .await
            .map_err(|e| match e {
                crate::repositories::RepositoryError::NotFound => {
                    ServiceError::NotFound("Account not found.".to_string())
                }
                other => ServiceError::repository("UserRepository", other),
            })?;

        log::info!("Account {} updated by {}.", user.id, actor_id);

        Ok(user)
    }
}

#[async_trait]
impl RequestHandler<UserRequest> for UserRequestHandler {
    async fn handle_request(&self, request: UserRequest) {
        match request {
            UserRequest::Register { new_user, response } => {
                let result = self.register(new_user).await;
                let _ = response.send(result);
            }
            UserRequest::Login {
                credentials,
                response,
            } => {
                let result = self.login(credentials).await;
                let _ = response.send(result);
            }
            UserRequest::GetUser { id, response } => {
                let result = self.get_user(&id).await;
                let _ = response.send(result);
            }
            UserRequest::ListUsers { actor_id, response } => {
                let result = self.list_users(&actor_id).await;
                let _ = response.send(result);
            }
            UserRequest::UpdateUser {
                actor_id,
                user_id,
                update,
                response,
            } => {
                let result = self.update_user(&actor_id, &user_id, update).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        UserService {}
    }
}

#[async_trait]
impl Service<UserRequest, UserRequestHandler> for UserService {}
