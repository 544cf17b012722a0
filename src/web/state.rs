//! # Web API Application State
//!
//! Shared state for the web API: database pool, services, the prediction
//! orchestrator, the queue client, and operational status.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use sqlx::PgPool;

use super::auth::JwtAuthenticator;
use crate::config::MlServeConfig;
use crate::messaging::QueueClient;
use crate::orchestration::PredictionOrchestrator;
use crate::services::{
    InMemorySessionStore, ModelService, PgRequestStore, RequestStore, SessionStore,
    TransactionService, UserService,
};

/// Operational status tracked for the health endpoint
#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub environment: String,
    pub started_at: Instant,
}

/// Shared application state for the web API
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<MlServeConfig>,
    pub orchestrator: Arc<PredictionOrchestrator>,
    pub queue_client: Arc<QueueClient>,
    pub users: UserService,
    pub transactions: TransactionService,
    pub models: ModelService,
    pub requests: Arc<dyn RequestStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub auth: Arc<JwtAuthenticator>,
    pub status: Arc<RwLock<ServiceStatus>>,
}

impl AppState {
    /// Wire the full service graph over an existing pool.
    ///
    /// The queue client shares the database URL but owns its connection;
    /// it connects lazily on first use unless `connect` was called during
    /// bootstrap.
    pub fn build(pool: PgPool, config: MlServeConfig) -> Self {
        let config = Arc::new(config);

        let queue_client = Arc::new(QueueClient::new(
            config.database_url.clone(),
            config.request_queue.clone(),
        ));

        let requests: Arc<dyn RequestStore> = Arc::new(PgRequestStore::new(pool.clone()));
        let models = ModelService::new(pool.clone());

        let orchestrator = Arc::new(PredictionOrchestrator::new(
            requests.clone(),
            Arc::new(models.clone()),
            queue_client.clone(),
            config.max_input_bytes,
        ));

        let environment = std::env::var("MLSERVE_ENV").unwrap_or_else(|_| "development".to_string());

        Self {
            users: UserService::new(pool.clone()),
            transactions: TransactionService::new(pool.clone()),
            models,
            requests,
            sessions: Arc::new(InMemorySessionStore::new(config.chat_history_limit)),
            auth: Arc::new(JwtAuthenticator::new(
                &config.jwt_secret,
                config.jwt_expiry_hours,
            )),
            status: Arc::new(RwLock::new(ServiceStatus {
                environment,
                started_at: Instant::now(),
            })),
            orchestrator,
            queue_client,
            config,
            pool,
        }
    }
}
