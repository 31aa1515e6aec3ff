use crate::domain::{models::{purchase::Purchase, ticket::Ticket}, ports::PurchaseRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPurchaseRepo {
    pool: PgPool,
}

impl PostgresPurchaseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseRepository for PostgresPurchaseRepo {
    async fn purchase(&self, ticket_id: &str, user_id: &str, quantity: i64) -> Result<(Purchase, Ticket), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // The UPDATE row lock makes a concurrent buyer wait and then re-evaluate
        // `quantity >= $1` against the committed value.
        let ticket = sqlx::query_as::<_, Ticket>(
            r#"UPDATE tickets SET quantity = quantity - $1, sold = sold + $1
               WHERE id = $2 AND quantity >= $1
               RETURNING *"#
        )
            .bind(quantity)
            .bind(ticket_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::InsufficientInventory)?;

        let purchase = Purchase::new(user_id.to_string(), ticket_id.to_string(), quantity, ticket.price);

        let created = sqlx::query_as::<_, Purchase>(
            r#"INSERT INTO purchases (id, user_id, ticket_id, quantity, total_amount, purchased_at)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#
        )
            .bind(&purchase.id)
            .bind(&purchase.user_id)
            .bind(&purchase.ticket_id)
            .bind(purchase.quantity)
            .bind(purchase.total_amount)
            .bind(purchase.purchased_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((created, ticket))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Purchase>, AppError> {
        sqlx::query_as::<_, Purchase>("SELECT * FROM purchases WHERE user_id = $1 ORDER BY purchased_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_ticket(&self, ticket_id: &str) -> Result<Vec<Purchase>, AppError> {
        sqlx::query_as::<_, Purchase>("SELECT * FROM purchases WHERE ticket_id = $1 ORDER BY purchased_at DESC")
            .bind(ticket_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
