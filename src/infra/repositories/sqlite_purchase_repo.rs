use crate::domain::{models::{purchase::Purchase, ticket::Ticket}, ports::PurchaseRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePurchaseRepo {
    pool: SqlitePool,
}

impl SqlitePurchaseRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseRepository for SqlitePurchaseRepo {
    async fn purchase(&self, ticket_id: &str, user_id: &str, quantity: i64) -> Result<(Purchase, Ticket), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // The availability check and the decrement are one statement, so two
        // buyers can never both pass the check on the same units.
        let ticket = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET quantity = quantity - ?, sold = sold + ?
             WHERE id = ? AND quantity >= ?
             RETURNING *"
        )
            .bind(quantity)
            .bind(quantity)
            .bind(ticket_id)
            .bind(quantity)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::InsufficientInventory)?;

        let purchase = Purchase::new(user_id.to_string(), ticket_id.to_string(), quantity, ticket.price);

        let created = sqlx::query_as::<_, Purchase>(
            "INSERT INTO purchases (id, user_id, ticket_id, quantity, total_amount, purchased_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *"
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
        sqlx::query_as::<_, Purchase>("SELECT * FROM purchases WHERE user_id = ? ORDER BY purchased_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_ticket(&self, ticket_id: &str) -> Result<Vec<Purchase>, AppError> {
        sqlx::query_as::<_, Purchase>("SELECT * FROM purchases WHERE ticket_id = ? ORDER BY purchased_at DESC")
            .bind(ticket_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
