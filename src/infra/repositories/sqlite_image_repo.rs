use crate::domain::{models::image::Image, ports::ImageRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteImageRepo {
    pool: SqlitePool,
}

impl SqliteImageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for SqliteImageRepo {
    async fn create(&self, image: &Image) -> Result<Image, AppError> {
        sqlx::query_as::<_, Image>(
            "INSERT INTO images (id, name, file_url, content_type, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
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
        sqlx::query_as::<_, Image>("SELECT * FROM images WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
