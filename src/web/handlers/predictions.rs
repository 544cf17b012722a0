//! # Prediction Handlers
//!
//! The synchronous face of the orchestrator: POST blocks until the request
//! record reaches a terminal state (or the queue leg errors, in which case
//! the record is already failed and the error maps to an HTTP status).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use super::users::LimitQuery;
use crate::models::{PredictionRequest, RequestStats, RequestType};
use crate::orchestration::PredictionInput;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePredictionRequest {
    pub user_id: i64,
    pub model_id: i64,
    pub input_data: String,
    #[serde(default)]
    pub request_type: RequestType,
    pub timeout_seconds: Option<u64>,
}

/// Run a prediction end to end: POST /v1/predictions
pub async fn create_prediction(
    State(state): State<AppState>,
    Json(request): Json<CreatePredictionRequest>,
) -> ApiResult<(StatusCode, Json<PredictionRequest>)> {
    info!(
        user_id = request.user_id,
        model_id = request.model_id,
        "Prediction requested via web API"
    );

    let timeout = Duration::from_secs(
        request
            .timeout_seconds
            .unwrap_or(state.config.default_timeout_seconds),
    );

    let record = state
        .orchestrator
        .process_prediction_request(PredictionInput {
            user_id: request.user_id,
            model_id: request.model_id,
            input_data: request.input_data,
            request_type: request.request_type,
            timeout,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch one request record: GET /v1/predictions/{id}
pub async fn get_prediction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PredictionRequest>> {
    let record = state
        .requests
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(record))
}

/// Requests still awaiting a reply: GET /v1/predictions/pending
pub async fn list_pending(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<PredictionRequest>>> {
    let records = state.requests.list_pending(query.limit).await?;
    Ok(Json(records))
}

/// One user's request history: GET /v1/users/{id}/predictions
pub async fn list_user_predictions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<PredictionRequest>>> {
    let records = state.requests.list_by_user(user_id, query.limit).await?;
    Ok(Json(records))
}

/// Aggregate statistics: GET /v1/users/{id}/predictions/stats
pub async fn user_prediction_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<RequestStats>> {
    let stats = state.requests.user_stats(user_id).await?;
    Ok(Json(stats))
}
