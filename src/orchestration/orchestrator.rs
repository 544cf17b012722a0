//! # Prediction Orchestrator
//!
//! Coordinates one prediction request across the record store and the queue
//! client. The record is created in `pending` before anything is published;
//! once it exists, every exit path — success reply, failure reply, timeout,
//! broker error, unexpected error — drives it to a terminal state before
//! the caller sees the outcome.
//!
//! Ordering within one request is strict: store-create precedes the queue
//! call, which precedes the terminal store-update. Concurrent requests are
//! independent and correlated solely by their own tokens.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use super::errors::OrchestrationError;
use crate::messaging::{JobPayload, RequestQueue};
use crate::models::{NewPredictionRequest, PredictionRequest, RequestType};
use crate::services::{ModelCatalog, RequestStore};

/// Bounds accepted for the round-trip timeout
const MIN_TIMEOUT_SECONDS: u64 = 1;
const MAX_TIMEOUT_SECONDS: u64 = 600;

/// Caller input for one prediction request
#[derive(Debug, Clone)]
pub struct PredictionInput {
    pub user_id: i64,
    pub model_id: i64,
    pub input_data: String,
    pub request_type: RequestType,
    pub timeout: Duration,
}

/// The saga coordinator. Collaborators are injected behind trait objects so
/// tests can script both the store and the queue.
pub struct PredictionOrchestrator {
    store: Arc<dyn RequestStore>,
    models: Arc<dyn ModelCatalog>,
    queue: Arc<dyn RequestQueue>,
    max_input_bytes: usize,
}

impl PredictionOrchestrator {
    pub fn new(
        store: Arc<dyn RequestStore>,
        models: Arc<dyn ModelCatalog>,
        queue: Arc<dyn RequestQueue>,
        max_input_bytes: usize,
    ) -> Self {
        Self {
            store,
            models,
            queue,
            max_input_bytes,
        }
    }

    /// Process one prediction request end to end.
    ///
    /// Returns the terminal record on a worker-reported outcome (success or
    /// failure reply). Queue-leg errors (timeout, connection loss, anything
    /// unexpected) first force the record to `failed`, then propagate to the
    /// caller — the persisted record is never left `pending` unless that
    /// terminal write itself fails, which is logged and accepted.
    pub async fn process_prediction_request(
        &self,
        input: PredictionInput,
    ) -> Result<PredictionRequest, OrchestrationError> {
        // 1. Reject malformed input before any state exists.
        self.validate(&input)?;

        // 2. The model must exist up front: its cost function prices the
        //    request on completion.
        let model = self
            .models
            .find_model(input.model_id)
            .await?
            .ok_or(OrchestrationError::NotFound {
                entity: "model",
                id: input.model_id,
            })?;

        // 3. Create the pending record. Failures here stop the operation
        //    with nothing published.
        let record = self
            .store
            .create(NewPredictionRequest {
                user_id: input.user_id,
                model_id: input.model_id,
                request_type: input.request_type,
                input_data: input.input_data.clone(),
            })
            .await?;

        info!(
            request_id = record.id,
            user_id = input.user_id,
            model_id = input.model_id,
            timeout_s = input.timeout.as_secs(),
            "Prediction request created, publishing job"
        );

        // 4. Queue round-trip.
        let reply = match self
            .queue
            .send_request(JobPayload::new(input.input_data), input.timeout)
            .await
        {
            Ok(reply) => reply,
            Err(queue_err) => {
                // Terminal write first, then the original error propagates.
                self.force_fail(record.id, queue_err.to_string()).await;
                return Err(queue_err.into());
            }
        };

        // 5. Interpret the reply and persist the terminal state.
        let terminal = if reply.success {
            let cost = model.calculate_cost(1);
            let metrics = reply
                .metrics
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "{}".to_string());

            self.store
                .complete_request(
                    record.id,
                    reply.output_data.clone().unwrap_or_default(),
                    Some(metrics),
                    reply.execution_time_ms,
                    cost,
                )
                .await?
        } else {
            self.store
                .fail_request(
                    record.id,
                    reply.error_message().to_string(),
                    reply.execution_time_ms,
                )
                .await?
        };

        info!(
            request_id = terminal.id,
            status = %terminal.status,
            execution_time_ms = terminal.execution_time_ms,
            "Prediction request finished"
        );

        Ok(terminal)
    }

    fn validate(&self, input: &PredictionInput) -> Result<(), OrchestrationError> {
        if input.user_id <= 0 {
            return Err(OrchestrationError::Validation("invalid user id".into()));
        }
        if input.model_id <= 0 {
            return Err(OrchestrationError::Validation("invalid model id".into()));
        }
        if input.input_data.trim().is_empty() {
            return Err(OrchestrationError::Validation(
                "input data cannot be empty".into(),
            ));
        }
        if input.input_data.len() > self.max_input_bytes {
            return Err(OrchestrationError::Validation(format!(
                "input data exceeds {} bytes",
                self.max_input_bytes
            )));
        }

        let timeout_seconds = input.timeout.as_secs();
        if !(MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&timeout_seconds) {
            return Err(OrchestrationError::Validation(format!(
                "timeout must be between {MIN_TIMEOUT_SECONDS} and {MAX_TIMEOUT_SECONDS} seconds"
            )));
        }

        Ok(())
    }

    /// Best-effort terminal write on the error path. If this write fails the
    /// record may remain pending — a known residual risk; the original error
    /// still reaches the caller.
    async fn force_fail(&self, request_id: i64, reason: String) {
        warn!(request_id, reason = %reason, "Queue leg failed, forcing record to failed");

        if let Err(write_err) = self.store.fail_request(request_id, reason, None).await {
            error!(
                request_id,
                error = %write_err,
                "Failed to mark request as failed; record may remain pending"
            );
        }
    }
}
