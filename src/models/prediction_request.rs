//! # Prediction Request Model
//!
//! One row per prediction job, tracking its full lifecycle from `pending`
//! through a terminal state.
//!
//! ## Invariants
//!
//! - Status moves forward only; the transition table in
//!   [`crate::state_machine`] is the single authority and every status write
//!   goes through the record store, which consults it first.
//! - `output_data` is set if and only if the request completed.
//! - `cost` is written only on completion; failures leave it at its prior
//!   value (zero unless a previous write set it).
//!
//! ## Database Schema
//!
//! Maps to the `prediction_requests` table:
//! - `status`: `request_status` Postgres enum
//! - `cost`: NUMERIC(10,4), zero until completion
//! - `execution_time_ms`: BIGINT, null until reported by a worker

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::state_machine::RequestStatus;

/// Kind of work requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "request_type", rename_all = "snake_case")]
pub enum RequestType {
    Prediction,
    Custom,
}

impl Default for RequestType {
    fn default() -> Self {
        Self::Prediction
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PredictionRequest {
    pub id: i64,
    pub user_id: i64,
    pub model_id: i64,
    pub request_type: RequestType,
    pub input_data: String,
    pub output_data: Option<String>,
    pub output_metrics: Option<String>,
    pub cost: BigDecimal,
    pub execution_time_ms: Option<i64>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New request for creation; always starts out `pending`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPredictionRequest {
    pub user_id: i64,
    pub model_id: i64,
    pub request_type: RequestType,
    pub input_data: String,
}

/// Field patch applied together with a terminal status write.
///
/// `None` fields leave the column untouched, which is what keeps the
/// output-iff-completed and cost-only-on-completed invariants: a failure
/// patch simply never carries `output_data` or `cost`.
#[derive(Debug, Clone, Default)]
pub struct TerminalUpdate {
    pub output_data: Option<String>,
    pub output_metrics: Option<String>,
    pub cost: Option<BigDecimal>,
    pub execution_time_ms: Option<i64>,
}

/// Aggregate request statistics for one user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RequestStats {
    pub total_requests: i64,
    pub completed_requests: i64,
    pub failed_requests: i64,
    pub total_cost: BigDecimal,
    pub avg_execution_time_ms: BigDecimal,
}

impl PredictionRequest {
    /// Insert a new `pending` request
    pub async fn create(
        pool: &PgPool,
        new_request: NewPredictionRequest,
    ) -> Result<PredictionRequest, sqlx::Error> {
        sqlx::query_as::<_, PredictionRequest>(
            r#"
            INSERT INTO prediction_requests (user_id, model_id, request_type, input_data,
                                             cost, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0.0, 'pending', NOW(), NOW())
            RETURNING id, user_id, model_id, request_type, input_data, output_data,
                      output_metrics, cost, execution_time_ms, status, created_at, updated_at
            "#,
        )
        .bind(new_request.user_id)
        .bind(new_request.model_id)
        .bind(new_request.request_type)
        .bind(&new_request.input_data)
        .fetch_one(pool)
        .await
    }

    /// Find a request by ID
    pub async fn find_by_id(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<PredictionRequest>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRequest>(
            r#"
            SELECT id, user_id, model_id, request_type, input_data, output_data,
                   output_metrics, cost, execution_time_ms, status, created_at, updated_at
            FROM prediction_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Write a new status together with its terminal fields.
    ///
    /// Untouched columns keep their value via COALESCE, so a failure write
    /// never clobbers `output_data` or `cost`.
    pub async fn apply_status(
        pool: &PgPool,
        id: i64,
        status: RequestStatus,
        update: TerminalUpdate,
    ) -> Result<Option<PredictionRequest>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRequest>(
            r#"
            UPDATE prediction_requests
            SET status = $2,
                output_data = COALESCE($3, output_data),
                output_metrics = COALESCE($4, output_metrics),
                cost = COALESCE($5, cost),
                execution_time_ms = COALESCE($6, execution_time_ms),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, model_id, request_type, input_data, output_data,
                      output_metrics, cost, execution_time_ms, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(&update.output_data)
        .bind(&update.output_metrics)
        .bind(&update.cost)
        .bind(update.execution_time_ms)
        .fetch_optional(pool)
        .await
    }

    /// List a user's requests, oldest first
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<PredictionRequest>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRequest>(
            r#"
            SELECT id, user_id, model_id, request_type, input_data, output_data,
                   output_metrics, cost, execution_time_ms, status, created_at, updated_at
            FROM prediction_requests
            WHERE user_id = $1
            ORDER BY created_at
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// List requests made against one model, oldest first
    pub async fn list_by_model(
        pool: &PgPool,
        model_id: i64,
        limit: i64,
    ) -> Result<Vec<PredictionRequest>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRequest>(
            r#"
            SELECT id, user_id, model_id, request_type, input_data, output_data,
                   output_metrics, cost, execution_time_ms, status, created_at, updated_at
            FROM prediction_requests
            WHERE model_id = $1
            ORDER BY created_at
            LIMIT $2
            "#,
        )
        .bind(model_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// List requests still waiting on a reply, oldest first
    pub async fn list_pending(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<PredictionRequest>, sqlx::Error> {
        sqlx::query_as::<_, PredictionRequest>(
            r#"
            SELECT id, user_id, model_id, request_type, input_data, output_data,
                   output_metrics, cost, execution_time_ms, status, created_at, updated_at
            FROM prediction_requests
            WHERE status = 'pending'
            ORDER BY created_at
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Aggregate statistics across one user's requests
    pub async fn user_stats(pool: &PgPool, user_id: i64) -> Result<RequestStats, sqlx::Error> {
        sqlx::query_as::<_, RequestStats>(
            r#"
            SELECT COUNT(*) AS total_requests,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed_requests,
                   COUNT(*) FILTER (WHERE status IN ('failed', 'cancelled')) AS failed_requests,
                   COALESCE(SUM(cost) FILTER (WHERE status = 'completed'), 0) AS total_cost,
                   COALESCE(AVG(execution_time_ms) FILTER (WHERE status = 'completed'), 0) AS avg_execution_time_ms
            FROM prediction_requests
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
