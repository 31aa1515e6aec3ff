use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::BlobStorage;
use crate::domain::services::{auth_service::AuthService, event_cache::EventCache};
use crate::infra::storage::cloudinary_storage::CloudinaryStorage;
use crate::infra::repositories::{
    postgres_user_repo::PostgresUserRepo, postgres_event_repo::PostgresEventRepo,
    postgres_ticket_repo::PostgresTicketRepo, postgres_purchase_repo::PostgresPurchaseRepo,
    postgres_review_repo::PostgresReviewRepo, postgres_image_repo::PostgresImageRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_ticket_repo::SqliteTicketRepo, sqlite_purchase_repo::SqlitePurchaseRepo,
    sqlite_review_repo::SqliteReviewRepo, sqlite_image_repo::SqliteImageRepo,
};

pub async fn bootstrap_state(config: &Config) -> anyhow::Result<AppState> {
    let blob_storage: Arc<dyn BlobStorage> = Arc::new(CloudinaryStorage::new(config.cloudinary.clone()));
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse::<PgConnectOptions>()?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;
        Ok(postgres_state(config, pool, blob_storage)?)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;
        Ok(sqlite_state(config, pool, blob_storage)?)
    }
}

pub fn postgres_state(config: &Config, pool: PgPool, blob_storage: Arc<dyn BlobStorage>) -> Result<AppState, crate::error::AppError> {
    Ok(AppState {
        config: config.clone(),
        user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
        event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
        ticket_repo: Arc::new(PostgresTicketRepo::new(pool.clone())),
        purchase_repo: Arc::new(PostgresPurchaseRepo::new(pool.clone())),
        review_repo: Arc::new(PostgresReviewRepo::new(pool.clone())),
        image_repo: Arc::new(PostgresImageRepo::new(pool)),
        auth_service: Arc::new(AuthService::new(config)?),
        blob_storage,
        event_cache: Arc::new(EventCache::from_config(&config.cache)),
    })
}

pub fn sqlite_state(config: &Config, pool: SqlitePool, blob_storage: Arc<dyn BlobStorage>) -> Result<AppState, crate::error::AppError> {
    Ok(AppState {
        config: config.clone(),
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
        ticket_repo: Arc::new(SqliteTicketRepo::new(pool.clone())),
        purchase_repo: Arc::new(SqlitePurchaseRepo::new(pool.clone())),
        review_repo: Arc::new(SqliteReviewRepo::new(pool.clone())),
        image_repo: Arc::new(SqliteImageRepo::new(pool)),
        auth_service: Arc::new(AuthService::new(config)?),
        blob_storage,
        event_cache: Arc::new(EventCache::from_config(&config.cache)),
    })
}

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations/postgres").run(pool).await
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations/sqlite").run(pool).await
}
