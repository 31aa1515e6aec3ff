use crate::domain::{models::image::Image, ports::ImageRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresImageRepo {
    pool: PgPool,
}

impl PostgresImageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PostgresImageRepo {
    async fn create(&self, image: &Image) -> Result<Image, AppError> {
        sqlx::query_as::<_, Image>(
            "INSERT INTO images (id, name, file_url, content_type, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&image.id)
            .bind(&image.name)
            .bind(&image.file_url)
            .bind(&image.content_type)
            .bind(image.created_at)
            .bind(image.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Image>, AppError> {
        sqlx::query_as::<_, Image>("SELECT * FROM images WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
