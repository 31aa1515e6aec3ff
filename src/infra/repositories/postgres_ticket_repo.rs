use crate::domain::{models::ticket::{Ticket, TicketChanges}, ports::TicketRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresTicketRepo {
    pool: PgPool,
}

impl PostgresTicketRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepo {
    async fn create(&self, ticket: &Ticket) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(
            r#"INSERT INTO tickets (id, event_id, creator_id, type, price, quantity, sold)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#
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
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_event_and_type(&self, event_id: &str, ticket_type: &str) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE event_id = $1 AND type = $2")
            .bind(event_id)
            .bind(ticket_type)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE event_id = $1 ORDER BY price ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, id: &str, changes: &TicketChanges) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(
            "UPDATE tickets
             SET type = COALESCE($1, type), price = COALESCE($2, price), quantity = COALESCE($3, quantity)
             WHERE id = $4 RETURNING *"
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
