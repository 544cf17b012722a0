//! # Request Record Store
//!
//! The persistence contract the orchestrator drives the request lifecycle
//! through. `create` validates referenced entities, and the terminal
//! helpers (`complete_request` / `fail_request`) resolve the state-machine
//! transition before writing, so a terminal record can never be moved
//! again — attempts fail with an invalid-transition error instead of
//! silently rewriting history.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{
    MlModel, NewPredictionRequest, PredictionRequest, RequestStats, TerminalUpdate, User,
};
use crate::state_machine::{determine_target_state, RequestEvent, StateMachineError};

/// Errors surfaced by record-store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    InvalidTransition(#[from] StateMachineError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Record-store contract consumed by the orchestrator.
///
/// `create` fails NotFound when the referenced user or model is missing;
/// the terminal helpers fail NotFound when the id is unknown and
/// InvalidTransition when the record is already terminal.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn create(&self, draft: NewPredictionRequest) -> Result<PredictionRequest, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<PredictionRequest>, StoreError>;

    /// Drive the record to `completed`, attaching output, metrics,
    /// execution time, and cost.
    async fn complete_request(
        &self,
        id: i64,
        output_data: String,
        metrics: Option<String>,
        execution_time_ms: Option<i64>,
        cost: BigDecimal,
    ) -> Result<PredictionRequest, StoreError>;

    /// Drive the record to `failed`, recording the error text as output
    /// metrics. Output data and cost are left untouched.
    async fn fail_request(
        &self,
        id: i64,
        error_message: String,
        execution_time_ms: Option<i64>,
    ) -> Result<PredictionRequest, StoreError>;

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<PredictionRequest>, StoreError>;

    async fn list_by_model(
        &self,
        model_id: i64,
        limit: i64,
    ) -> Result<Vec<PredictionRequest>, StoreError>;

    /// Requests still awaiting a reply, oldest first. Exists for
    /// operational tooling; the orchestrator itself never sweeps.
    async fn list_pending(&self, limit: i64) -> Result<Vec<PredictionRequest>, StoreError>;

    async fn user_stats(&self, user_id: i64) -> Result<RequestStats, StoreError>;
}

/// Postgres-backed record store
#[derive(Clone)]
pub struct PgRequestStore {
    pool: PgPool,
}

impl PgRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the record and resolve the requested transition against the
    /// state machine before touching the row.
    async fn transition(
        &self,
        id: i64,
        event: RequestEvent,
        update: TerminalUpdate,
    ) -> Result<PredictionRequest, StoreError> {
        let record = PredictionRequest::find_by_id(&self.pool, id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "request",
                id,
            })?;

        let target = determine_target_state(record.status, &event)?;

        PredictionRequest::apply_status(&self.pool, id, target, update)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "request",
                id,
            })
    }
}

#[async_trait]
impl RequestStore for PgRequestStore {
    async fn create(&self, draft: NewPredictionRequest) -> Result<PredictionRequest, StoreError> {
        // Referenced entities are checked up front so the caller gets a
        // clean NotFound instead of a foreign-key violation.
        if User::find_by_id(&self.pool, draft.user_id).await?.is_none() {
            return Err(StoreError::NotFound {
                entity: "user",
                id: draft.user_id,
            });
        }

        if MlModel::find_by_id(&self.pool, draft.model_id)
            .await?
            .is_none()
        {
            return Err(StoreError::NotFound {
                entity: "model",
                id: draft.model_id,
            });
        }

        Ok(PredictionRequest::create(&self.pool, draft).await?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<PredictionRequest>, StoreError> {
        Ok(PredictionRequest::find_by_id(&self.pool, id).await?)
    }

    async fn complete_request(
        &self,
        id: i64,
        output_data: String,
        metrics: Option<String>,
        execution_time_ms: Option<i64>,
        cost: BigDecimal,
    ) -> Result<PredictionRequest, StoreError> {
        self.transition(
            id,
            RequestEvent::Complete,
            TerminalUpdate {
                output_data: Some(output_data),
                output_metrics: metrics,
                cost: Some(cost),
                execution_time_ms,
            },
        )
        .await
    }

    async fn fail_request(
        &self,
        id: i64,
        error_message: String,
        execution_time_ms: Option<i64>,
    ) -> Result<PredictionRequest, StoreError> {
        self.transition(
            id,
            RequestEvent::fail_with_error(error_message.clone()),
            TerminalUpdate {
                output_data: None,
                output_metrics: Some(error_message),
                cost: None,
                execution_time_ms,
            },
        )
        .await
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<PredictionRequest>, StoreError> {
        Ok(PredictionRequest::list_by_user(&self.pool, user_id, limit).await?)
    }

    async fn list_by_model(
        &self,
        model_id: i64,
        limit: i64,
    ) -> Result<Vec<PredictionRequest>, StoreError> {
        Ok(PredictionRequest::list_by_model(&self.pool, model_id, limit).await?)
    }

    async fn list_pending(&self, limit: i64) -> Result<Vec<PredictionRequest>, StoreError> {
        Ok(PredictionRequest::list_pending(&self.pool, limit).await?)
    }

    async fn user_stats(&self, user_id: i64) -> Result<RequestStats, StoreError> {
        Ok(PredictionRequest::user_stats(&self.pool, user_id).await?)
    }
}
