use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tower_http::trace::TraceLayer;

use super::catalog::CatalogRequest;
use super::chat::ChatRequest;
use super::transactions::TransactionServiceRequest;
use super::users::UserRequest;
use super::ServiceError;
use crate::models::app_settings::AppSettingsUpdate;
use crate::models::catalog::NewTutorial;
use crate::models::chat::NewChatMessage;
use crate::models::offers::NewOffer;
use crate::models::transactions::{ServiceRequest, TransactionStatus};
use crate::models::users::{Credentials, NewUser, UserUpdate};

#[derive(Clone)]
struct AppState {
    user_channel: mpsc::Sender<UserRequest>,
    transaction_channel: mpsc::Sender<TransactionServiceRequest>,
    chat_channel: mpsc::Sender<ChatRequest>,
    catalog_channel: mpsc::Sender<CatalogRequest>,
}

#[derive(Deserialize)]
struct ActorQuery {
    actor_id: String,
}

#[derive(Deserialize)]
struct UpdateUserBody {
    actor_id: String,
    #[serde(flatten)]
    update: UserUpdate,
}

#[derive(Deserialize)]
struct SettleBody {
    actor_id: String,
    status: TransactionStatus,
}

#[derive(Deserialize)]
struct AddOfferBody {
    actor_id: String,
    #[serde(flatten)]
    offer: NewOffer,
}

#[derive(Deserialize)]
struct UpdateSettingsBody {
    actor_id: String,
    #[serde(flatten)]
    update: AppSettingsUpdate,
}

#[derive(Deserialize)]
struct AddTutorialBody {
    actor_id: String,
    #[serde(flatten)]
    tutorial: NewTutorial,
}

#[derive(Deserialize)]
struct ToggleBody {
    actor_id: String,
}

fn error_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(json!({ "description": err.to_string() })))
}

fn channel_failure<E: std::fmt::Display>(e: E) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "description": format!("Failed to process request: {}", e) })),
    )
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .user_channel
        .send(UserRequest::Register {
            new_user: req,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(user)) => (StatusCode::CREATED, Json(json!(user))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .user_channel
        .send(UserRequest::Login {
            credentials: req,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(user)) => (StatusCode::OK, Json(json!(user))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .user_channel
        .send(UserRequest::GetUser { id, response: tx })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(Some(user))) => (StatusCode::OK, Json(json!(user))),
        Ok(Ok(None)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "description": "Account not found." })),
        ),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ActorQuery>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .user_channel
        .send(UserRequest::ListUsers {
            actor_id: query.actor_id,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(users)) => (StatusCode::OK, Json(json!(users))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserBody>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .user_channel
        .send(UserRequest::UpdateUser {
            actor_id: req.actor_id,
            user_id: id,
            update: req.update,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(user)) => (StatusCode::OK, Json(json!(user))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn submit_request(
    State(state): State<AppState>,
    Json(req): Json<ServiceRequest>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .transaction_channel
        .send(TransactionServiceRequest::SubmitRequest {
            request: req,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(transaction)) => (StatusCode::CREATED, Json(json!(transaction))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .transaction_channel
        .send(TransactionServiceRequest::GetTransaction {
            transaction_id: id,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(Some(transaction))) => (StatusCode::OK, Json(json!(transaction))),
        Ok(Ok(None)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "description": "Request not found." })),
        ),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn settle_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SettleBody>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .transaction_channel
        .send(TransactionServiceRequest::Settle {
            actor_id: req.actor_id,
            transaction_id: id,
            decision: req.status,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(transaction)) => (StatusCode::OK, Json(json!(transaction))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ActorQuery>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .transaction_channel
        .send(TransactionServiceRequest::ListAll {
            actor_id: query.actor_id,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(transactions)) => (StatusCode::OK, Json(json!(transactions))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn user_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .transaction_channel
        .send(TransactionServiceRequest::History {
            user_id: id,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(transactions)) => (StatusCode::OK, Json(json!(transactions))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<NewChatMessage>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .chat_channel
        .send(ChatRequest::SendMessage {
            message: req,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(message)) => (StatusCode::CREATED, Json(json!(message))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn chat_thread(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .chat_channel
        .send(ChatRequest::Thread {
            user_id,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(messages)) => (StatusCode::OK, Json(json!(messages))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn chat_overview(
    State(state): State<AppState>,
    Query(query): Query<ActorQuery>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .chat_channel
        .send(ChatRequest::ListAll {
            actor_id: query.actor_id,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(messages)) => (StatusCode::OK, Json(json!(messages))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn list_offers(State(state): State<AppState>) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::ListOffers { response: tx })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(offers)) => (StatusCode::OK, Json(json!(offers))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn add_offer(
    State(state): State<AppState>,
    Json(req): Json<AddOfferBody>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::AddOffer {
            actor_id: req.actor_id,
            offer: req.offer,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(offer)) => (StatusCode::CREATED, Json(json!(offer))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn delete_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::DeleteOffer {
            actor_id: query.actor_id,
            offer_id: id,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(())) => (StatusCode::OK, Json(json!({ "description": "Offer deleted." }))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::GetSettings { response: tx })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(settings)) => (StatusCode::OK, Json(json!(settings))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn update_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsBody>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::UpdateSettings {
            actor_id: req.actor_id,
            update: req.update,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(settings)) => (StatusCode::OK, Json(json!(settings))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn list_services(State(state): State<AppState>) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::ListServices { response: tx })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(services)) => (StatusCode::OK, Json(json!(services))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn toggle_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleBody>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::ToggleService {
            actor_id: req.actor_id,
            service_id: id,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(service)) => (StatusCode::OK, Json(json!(service))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn list_tutorials(State(state): State<AppState>) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::ListTutorials { response: tx })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(tutorials)) => (StatusCode::OK, Json(json!(tutorials))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn add_tutorial(
    State(state): State<AppState>,
    Json(req): Json<AddTutorialBody>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::AddTutorial {
            actor_id: req.actor_id,
            tutorial: req.tutorial,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(tutorial)) => (StatusCode::CREATED, Json(json!(tutorial))),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

async fn delete_tutorial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> impl IntoResponse {
    let (tx, rx) = oneshot::channel();

    if let Err(e) = state
        .catalog_channel
        .send(CatalogRequest::DeleteTutorial {
            actor_id: query.actor_id,
            tutorial_id: id,
            response: tx,
        })
        .await
    {
        return channel_failure(e);
    }

    match rx.await {
        Ok(Ok(())) => (
            StatusCode::OK,
            Json(json!({ "description": "Tutorial deleted." })),
        ),
        Ok(Err(err)) => error_response(err),
        Err(e) => channel_failure(e),
    }
}

pub async fn start_http_server(
    listen: &str,
    user_channel: mpsc::Sender<UserRequest>,
    transaction_channel: mpsc::Sender<TransactionServiceRequest>,
    chat_channel: mpsc::Sender<ChatRequest>,
    catalog_channel: mpsc::Sender<CatalogRequest>,
) -> Result<(), anyhow::Error> {
    let app_state = AppState {
        user_channel,
        transaction_channel,
        chat_channel,
        catalog_channel,
    };

    let app = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user).put(update_user))
        .route("/users/{id}/transactions", get(user_history))
        .route("/transactions", post(submit_request).get(list_transactions))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}/settle", post(settle_request))
        .route("/chat", post(send_message).get(chat_overview))
        .route("/chat/{user_id}", get(chat_thread))
        .route("/offers", get(list_offers).post(add_offer))
        .route("/offers/{id}", delete(delete_offer))
        .route("/settings", get(get_settings).put(update_settings))
        .route("/services", get(list_services))
        .route("/services/{id}/toggle", post(toggle_service))
        .route("/tutorials", get(list_tutorials).post(add_tutorial))
        .route("/tutorials/{id}", delete(delete_tutorial))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
