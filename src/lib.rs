pub mod api;
pub mod background;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod state;

use crate::api::router::create_router;
use crate::background::start_cache_sweeper;
use crate::config::Config;
use crate::infra::factory::bootstrap_state;
use crate::state::AppState;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "ticketing-service.log";

/// Pretty console output filtered by `RUST_LOG`, plus daily JSON files in `log_dir`.
/// Keep the returned guard alive or buffered file lines are lost.
pub fn init_logging(log_dir: &str) -> WorkerGuard {
    let (file_writer, guard) = tracing_appender::non_blocking(
        tracing_appender::rolling::daily(log_dir, LOG_FILE),
    );

    let json_file = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("info,ticketing_backend=debug,sqlx=warn"));

    let console = tracing_subscriber::fmt::layer()
        .pretty()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    tracing_subscriber::registry().with(console).with(json_file).init();

    info!(log_dir, file = LOG_FILE, "Logging initialized");
    guard
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let _guard = init_logging(&config.log_dir);

    let state = Arc::new(bootstrap_state(&config).await?);
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], config.port))).await?;

    serve(listener, state, shutdown_signal()).await
}

/// Serves the API on `listener` until `shutdown` resolves. The cache sweeper
/// runs for exactly as long as the server does.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let sweeper = tokio::spawn(start_cache_sweeper(
        state.event_cache.clone(),
        state.config.cache.sweep_interval,
    ));

    info!(addr = %listener.local_addr()?, "Ticketing API listening");

    let served = axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await;

    sweeper.abort();
    info!("Server stopped");

    Ok(served?)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested, draining connections"),
        Err(err) => {
            // Without a signal handler the server just runs until killed.
            error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
