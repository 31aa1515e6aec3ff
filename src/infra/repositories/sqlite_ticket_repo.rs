use crate::domain::{models::ticket::{Ticket, TicketChanges}, ports::TicketRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTicketRepo {
    pool: SqlitePool,
}

impl SqliteTicketRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for SqliteTicketRepo {
    async fn create(&self, ticket: &Ticket) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (id, event_id, creator_id, type, price, quantity, sold)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&ticket.id)
            .bind(&ticket.event_id)
            .bind(&ticket.creator_id)
            .bind(&ticket.ticket_type)
            .bind(ticket.price)
            .bind(ticket.quantity)
            .bind(ticket.sold)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_event_and_type(&self, event_id: &str, ticket_type: &str) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE event_id = ? AND type = ?")
            .bind(event_id)
            .bind(ticket_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE event_id = ? ORDER BY price ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, id: &str, changes: &TicketChanges) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets
             SET type = COALESCE(?, type), price = COALESCE(?, price), quantity = COALESCE(?, quantity)
             WHERE id = ? RETURNING *"
        )
            .bind(changes.ticket_type.as_deref())
            .bind(changes.price)
            .bind(changes.quantity)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Ticket not found".into()))
    }
}
