pub mod auth;
pub mod event;
pub mod image;
pub mod purchase;
pub mod review;
pub mod ticket;
pub mod user;

pub mod health {
    use axum::{response::IntoResponse, Json};

    pub async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({"status": "ok"}))
    }
}
