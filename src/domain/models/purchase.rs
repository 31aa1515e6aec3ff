use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A row of the append-only purchase ledger.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Purchase {
    pub id: String,
    pub user_id: String,
    pub ticket_id: String,
    pub quantity: i64,
    pub total_amount: f64,
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    /// `unit_price` is the ticket price at the moment the inventory was decremented.
    pub fn new(user_id: String, ticket_id: String, quantity: i64, unit_price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            ticket_id,
            quantity,
            total_amount: unit_price * quantity as f64,
            purchased_at: Utc::now(),
        }
    }
}
