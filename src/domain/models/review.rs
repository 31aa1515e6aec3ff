use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Review {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub rating: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(event_id: String, user_id: String, rating: i32, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            user_id,
            rating,
            content,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub review: Review,
    pub username: String,
}
