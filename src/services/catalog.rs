use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{require_admin, RequestHandler, Service, ServiceError};
use crate::models::app_settings::{AppSettings, AppSettingsUpdate};
use crate::models::catalog::{NewTutorial, ServiceStatus, Tutorial};
use crate::models::offers::{NewOffer, Offer};
use crate::repositories::app_settings::AppSettingsRepository;
use crate::repositories::catalog::CatalogRepository;
use crate::repositories::offers::OfferRepository;
use crate::repositories::users::UserRepository;
use crate::repositories::RepositoryError;

/// Everything the storefront reads but only the admin writes: promotional
/// offers, the app settings singleton, tutorials and the service toggles.
pub enum CatalogRequest {
    ListOffers {
        response: oneshot::Sender<Result<Vec<Offer>, ServiceError>>,
    },
    AddOffer {
        actor_id: String,
        offer: NewOffer,
        response: oneshot::Sender<Result<Offer, ServiceError>>,
    },
    DeleteOffer {
        actor_id: String,
        offer_id: String,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
    GetSettings {
        response: oneshot::Sender<Result<AppSettings, ServiceError>>,
    },
    UpdateSettings {
        actor_id: String,
        update: AppSettingsUpdate,
        response: oneshot::Sender<Result<AppSettings, ServiceError>>,
    },
    ListServices {
        response: oneshot::Sender<Result<Vec<ServiceStatus>, ServiceError>>,
    },
    ToggleService {
        actor_id: String,
        service_id: String,
        response: oneshot::Sender<Result<ServiceStatus, ServiceError>>,
    },
    ListTutorials {
        response: oneshot::Sender<Result<Vec<Tutorial>, ServiceError>>,
    },
    AddTutorial {
        actor_id: String,
        tutorial: NewTutorial,
        response: oneshot::Sender<Result<Tutorial, ServiceError>>,
    },
    DeleteTutorial {
        actor_id: String,
        tutorial_id: String,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct CatalogRequestHandler {
    offers: OfferRepository,
    settings: AppSettingsRepository,
    catalog: CatalogRepository,
    users: UserRepository,
}

impl CatalogRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        CatalogRequestHandler {
            offers: OfferRepository::new(sql_conn.clone()),
            settings: AppSettingsRepository::new(sql_conn.clone()),
            catalog: CatalogRepository::new(sql_conn.clone()),
            users: UserRepository::new(sql_conn),
        }
    }

    async fn add_offer(&self, actor_id: &str, offer: NewOffer) -> Result<Offer, ServiceError> {
        require_admin(&self.users, actor_id).await?;

        if offer.title.trim().is_empty() || offer.operator.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Offer title and operator are required.".to_string(),
            ));
        }

        if offer.price_in_cents <= 0 {
            return Err(ServiceError::Validation(
                "Offer price must be positive.".to_string(),
            ));
        }

        self.offers
            .insert_offer(&offer)
            .await
            .map_err(|e| ServiceError::repository("OfferRepository", e))
    }

    async fn delete_offer(&self, actor_id: &str, offer_id: &str) -> Result<(), ServiceError> {
        require_admin(&self.users, actor_id).await?;

        self.offers.delete_offer(offer_id).await.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::NotFound("Offer not found.".to_string()),
            other => ServiceError::repository("OfferRepository", other),
        })
    }

    async fn update_settings(
        &self,
        actor_id: &str,
        update: AppSettingsUpdate,
    ) -> Result<AppSettings, ServiceError> {
        require_admin(&self.users, actor_id).await?;

        self.settings
            .update_settings(&update)
            .await
            .map_err(|e| ServiceError::repository("AppSettingsRepository", e))
    }

    async fn toggle_service(
        &self,
        actor_id: &str,
        service_id: &str,
    ) -> Result<ServiceStatus, ServiceError> {
        require_admin(&self.users, actor_id).await?;

        let service = self.catalog.toggle_service(service_id).await.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::NotFound("Service not found.".to_string()),
            other => ServiceError::repository("CatalogRepository", other),
        })?;

        log::info!(
            "Service {} switched {} by {}.",
            service.id,
            if service.is_active { "on" } else { "off" },
            actor_id
        );

        Ok(service)
    }

    async fn add_tutorial(
        &self,
        actor_id: &str,
        tutorial: NewTutorial,
    ) -> Result<Tutorial, ServiceError> {
        require_admin(&self.users, actor_id).await?;

        if tutorial.title.trim().is_empty() || tutorial.video_url.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Tutorial title and video URL are required.".to_string(),
            ));
        }

        self.catalog
            .insert_tutorial(&tutorial)
            .await
            .map_err(|e| ServiceError::repository("CatalogRepository", e))
    }

    async fn delete_tutorial(&self, actor_id: &str, tutorial_id: &str) -> Result<(), ServiceError> {
        require_admin(&self.users, actor_id).await?;

        self.catalog
            .delete_tutorial(tutorial_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => {
                    ServiceError::NotFound("Tutorial not found.".to_string())
                }
                other => ServiceError::repository("CatalogRepository", other),
            })
    }
}

#[async_trait]
impl RequestHandler<CatalogRequest> for CatalogRequestHandler {
    async fn handle_request(&self, request: CatalogRequest) {
        match request {
            CatalogRequest::ListOffers { response } => {
                let result = self
                    .offers
                    .list_offers()
                    .await
                    .map_err(|e| ServiceError::repository("OfferRepository", e));
                let _ = response.send(result);
            }
            CatalogRequest::AddOffer {
                actor_id,
                offer,
                response,
            } => {
                let result = self.add_offer(&actor_id, offer).await;
                let _ = response.send(result);
            }
            CatalogRequest::DeleteOffer {
                actor_id,
                offer_id,
                response,
            } => {
                let result = self.delete_offer(&actor_id, &offer_id).await;
                let _ = response.send(result);
            }
            CatalogRequest::GetSettings { response } => {
                let result = self
                    .settings
                    .get_settings()
                    .await
                    .map_err(|e| ServiceError::repository("AppSettingsRepository", e));
                let _ = response.send(result);
            }
            CatalogRequest::UpdateSettings {
                actor_id,
                update,
                response,
            } => {
                let result = self.update_settings(&actor_id, update).await;
                let _ = response.send(result);
            }
            CatalogRequest::ListServices { response } => {
                let result = self
                    .catalog
                    .list_services()
                    .await
                    .map_err(|e| ServiceError::repository("CatalogRepository", e));
                let _ = response.send(result);
            }
            CatalogRequest::ToggleService {
                actor_id,
                service_id,
                response,
            } => {
                let result = self.toggle_service(&actor_id, &service_id).await;
                let _ = response.send(result);
            }
            CatalogRequest::ListTutorials { response } => {
                let result = self
                    .catalog
                    .list_tutorials()
                    .await
                    .map_err(|e| ServiceError::repository("CatalogRepository", e));
                let _ = response.send(result);
            }
            CatalogRequest::AddTutorial {
                actor_id,
                tutorial,
                response,
            } => {
                let result = self.add_tutorial(&actor_id, tutorial).await;
                let _ = response.send(result);
            }
            CatalogRequest::DeleteTutorial {
                actor_id,
                tutorial_id,
                response,
            } => {
                let result = self.delete_tutorial(&actor_id, &tutorial_id).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct CatalogService;

impl CatalogService {
    pub fn new() -> Self {
        CatalogService {}
    }
}

#[async_trait]
impl Service<CatalogRequest, CatalogRequestHandler> for CatalogService {}
