pub mod sqlite_user_repo;
pub mod sqlite_event_repo;
pub mod sqlite_ticket_repo;
pub mod sqlite_purchase_repo;
pub mod sqlite_review_repo;
pub mod sqlite_image_repo;

pub mod postgres_user_repo;
pub mod postgres_event_repo;
pub mod postgres_ticket_repo;
pub mod postgres_purchase_repo;
pub mod postgres_review_repo;
pub mod postgres_image_repo;
