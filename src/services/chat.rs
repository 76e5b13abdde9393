use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{require_reviewer, RequestHandler, Service, ServiceError};
use crate::models::chat::{ChatMessage, NewChatMessage};
use crate::repositories::chat::ChatRepository;
use crate::repositories::users::UserRepository;

pub enum ChatRequest {
    SendMessage {
        message: NewChatMessage,
        response: oneshot::Sender<Result<ChatMessage, ServiceError>>,
    },
    Thread {
        user_id: String,
        response: oneshot::Sender<Result<Vec<ChatMessage>, ServiceError>>,
    },
    ListAll {
        actor_id: String,
        response: oneshot::Sender<Result<Vec<ChatMessage>, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct ChatRequestHandler {
    repository: ChatRepository,
    users: UserRepository,
}

impl ChatRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = ChatRepository::new(sql_conn.clone());
        let users = UserRepository::new(sql_conn);

        ChatRequestHandler { repository, users }
    }

    async fn send_message(&self, mut message: NewChatMessage) -> Result<ChatMessage, ServiceError> {
        if message.text.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Message text must not be empty.".to_string(),
            ));
        }

        if message.is_admin {
            require_reviewer(&self.users, &message.sender_id).await?;

            if message.recipient_id.is_none() {
                return Err(ServiceError::Validation(
                    "Admin replies must name a recipient.".to_string(),
                ));
            }
        } else {
            // User messages always address the admin desk.
            message.recipient_id = None;

            let sender = self
                .users
                .get_user_by_id(&message.sender_id)
                .await
                .map_err(|e| ServiceError::repository("UserRepository", e))?;

            if sender.is_none() {
                return Err(ServiceError::NotFound("Account not found.".to_string()));
            }
        }

        self.repository
            .insert_message(&message)
            .await
            .map_err(|e| ServiceError::repository("ChatRepository", e))
    }

    async fn thread(&self, user_id: &str) -> Result<Vec<ChatMessage>, ServiceError> {
        self.repository
            .thread_for_user(user_id)
            .await
            .map_err(|e| ServiceError::repository("ChatRepository", e))
    }

    async fn list_all(&self, actor_id: &str) -> Result<Vec<ChatMessage>, ServiceError> {
        require_reviewer(&self.users, actor_id).await?;

        self.repository
            .list_all()
            .await
            .map_err(|e| ServiceError::repository("ChatRepository", e))
    }
}

#[async_trait]
impl RequestHandler<ChatRequest> for ChatRequestHandler {
    async fn handle_request(&self, request: ChatRequest) {
        match request {
            ChatRequest::SendMessage { message, response } => {
                let result = self.send_message(message).await;
                let _ = response.send(result);
            }
            ChatRequest::Thread { user_id, response } => {
                let result = self.thread(&user_id).await;
                let _ = response.send(result);
            }
            ChatRequest::ListAll { actor_id, response } => {
                let result = self.list_all(&actor_id).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct ChatService;

impl ChatService {
    pub fn new() -> Self {
        ChatService {}
    }
}

#[async_trait]
impl Service<ChatRequest, ChatRequestHandler> for ChatService {}
