use std::sync::Arc;
use crate::domain::ports::{
    UserRepository, EventRepository, TicketRepository, PurchaseRepository,
    ReviewRepository, ImageRepository, BlobStorage
};
use crate::domain::services::{auth_service::AuthService, event_cache::EventCache};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub purchase_repo: Arc<dyn PurchaseRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
    pub image_repo: Arc<dyn ImageRepository>,
    pub auth_service: Arc<AuthService>,
    pub blob_storage: Arc<dyn BlobStorage>,
    pub event_cache: Arc<EventCache>,
}
