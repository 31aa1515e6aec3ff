use crate::domain::models::{
    user::User, event::{Event, EventDetails}, ticket::{Ticket, TicketChanges}, purchase::Purchase,
    review::{Review, ReviewWithAuthor}, image::Image
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Option<User>, AppError>;
    async fn list_by_role(&self, role: &str) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_details_by_id(&self, id: &str) -> Result<Option<EventDetails>, AppError>;
    async fn list_details(&self) -> Result<Vec<EventDetails>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn create(&self, ticket: &Ticket) -> Result<Ticket, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError>;
    async fn find_by_event_and_type(&self, event_id: &str, ticket_type: &str) -> Result<Option<Ticket>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Ticket>, AppError>;
    /// Applies only the fields present in `changes`, in one statement. Never touches `sold`.
    async fn update(&self, id: &str, changes: &TicketChanges) -> Result<Ticket, AppError>;
}

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Atomically takes `quantity` units off the ticket and appends the ledger row.
    ///
    /// Fails with [`AppError::InsufficientInventory`] when fewer than `quantity`
    /// units remain, in which case nothing is written.
    async fn purchase(&self, ticket_id: &str, user_id: &str, quantity: i64) -> Result<(Purchase, Ticket), AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Purchase>, AppError>;
    async fn list_by_ticket(&self, ticket_id: &str) -> Result<Vec<Purchase>, AppError>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: &Review) -> Result<Review, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Review>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<ReviewWithAuthor>, AppError>;
    async fn update(&self, review: &Review) -> Result<Review, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, image: &Image) -> Result<Image, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Image>, AppError>;
}

#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Uploads the file and returns its public URL.
    async fn upload(&self, file_name: &str, content_type: &str, data: Vec<u8>) -> Result<String, AppError>;
}
