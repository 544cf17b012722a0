//! Worker entrypoint: consume the job queue with the configured prediction
//! handler until interrupted.
//!
//! Ships with the echo handler as the default executor; deployments wire a
//! real model behind [`PredictionHandler`].

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use mlserve_core::config::MlServeConfig;
use mlserve_core::logging::init_structured_logging;
use mlserve_core::worker::{ConsumerConfig, EchoHandler, PredictionConsumer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();

    let config = MlServeConfig::from_env()?;

    let consumer = PredictionConsumer::connect(
        &config.database_url,
        ConsumerConfig {
            request_queue: config.request_queue.clone(),
            poll_interval: Duration::from_millis(config.worker_poll_interval_ms),
            visibility_timeout_seconds: config.worker_visibility_timeout_seconds,
        },
        Arc::new(EchoHandler),
    )
    .await?;

    tokio::select! {
        _ = consumer.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping worker");
        }
    }

    Ok(())
}
