//! # Health Check Handler
//!
//! Liveness endpoint reporting database reachability and process uptime.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::web::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub uptime_seconds: u64,
    pub environment: String,
}

/// Basic health check: GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    let (environment, uptime_seconds) = {
        let status = state.status.read();
        (status.environment.clone(), status.started_at.elapsed().as_secs())
    };

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" },
        database,
        uptime_seconds,
        environment,
    })
}
