use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Ticket {
    pub id: String,
    pub event_id: String,
    pub creator_id: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub ticket_type: String,
    pub price: f64,
    /// Remaining inventory.
    pub quantity: i64,
    pub sold: i64,
}

impl Ticket {
    pub fn new(event_id: String, creator_id: String, ticket_type: String, price: f64, quantity: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            creator_id,
            ticket_type,
            price,
            quantity,
            sold: 0,
        }
    }
}

/// Fields a ticket update sets. `None` leaves the stored column as it is, so an
/// update never writes back a `quantity` it did not mean to change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketChanges {
    pub ticket_type: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}
