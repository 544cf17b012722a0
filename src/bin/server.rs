//! API server entrypoint: run migrations, wire the service graph, serve
//! HTTP until interrupted.

use tracing::info;

use mlserve_core::config::MlServeConfig;
use mlserve_core::database::{DatabaseConnection, DatabaseMigrations};
use mlserve_core::logging::init_structured_logging;
use mlserve_core::web::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let config = MlServeConfig::from_env()?;

    let db = DatabaseConnection::connect(&config.database_url).await?;
    DatabaseMigrations::run_all(db.pool()).await?;

    let state = AppState::build(db.pool().clone(), config.clone());

    // Fail fast if the broker is unreachable rather than on the first call
    state.queue_client.connect().await?;

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "mlserve API listening");

    let queue_client = state.queue_client.clone();
    let router = build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    queue_client.close().await;
    info!("mlserve API shut down");

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to listen for shutdown signal");
    }
}
