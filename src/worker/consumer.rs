//! # Prediction Consumer
//!
//! Polling loop over the shared job queue. Each claimed job runs through
//! the handler under wall-clock timing; the reply goes to the job's private
//! reply queue keyed by the same correlation token. Jobs whose expiration
//! has passed are archived without running inference — the caller has
//! already timed out and its reply queue is gone or about to be.
//!
//! Per-message failures never stop the loop: a reply send to a torn-down
//! queue, a malformed job body, or a handler panic-adjacent error is logged
//! and the loop moves on.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pgmq::PGMQueue;
use tracing::{debug, error, info, warn};

use super::handler::PredictionHandler;
use crate::messaging::{JobMessage, MessagingError, MessagingResult, ReplyMessage};

/// Consumer tuning knobs
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Shared job queue to consume
    pub request_queue: String,
    /// Sleep between polls when the queue is empty
    pub poll_interval: Duration,
    /// Visibility timeout for claimed jobs
    pub visibility_timeout_seconds: i32,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            request_queue: "ml_requests".to_string(),
            poll_interval: Duration::from_millis(250),
            visibility_timeout_seconds: 30,
        }
    }
}

pub struct PredictionConsumer {
    queue: PGMQueue,
    config: ConsumerConfig,
    handler: Arc<dyn PredictionHandler>,
}

impl PredictionConsumer {
    /// Connect to the broker and declare the job queue
    pub async fn connect(
        database_url: &str,
        config: ConsumerConfig,
        handler: Arc<dyn PredictionHandler>,
    ) -> MessagingResult<Self> {
        let queue = PGMQueue::new(database_url.to_string())
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?;

        queue.create(&config.request_queue).await.map_err(|e| {
            MessagingError::queue_operation(&config.request_queue, "create", e.to_string())
        })?;

        info!(queue = %config.request_queue, "Prediction consumer connected");

        Ok(Self {
            queue,
            config,
            handler,
        })
    }

    /// Consume until the task is cancelled. Transient broker errors back
    /// off and retry rather than killing the worker.
    pub async fn run(&self) {
        info!(queue = %self.config.request_queue, "Prediction consumer started");

        loop {
            match self.poll_once().await {
                Ok(true) => {} // processed a job, poll again immediately
                Ok(false) => tokio::time::sleep(self.config.poll_interval).await,
                Err(e) => {
                    error!(error = %e, "Queue poll failed, backing off");
                    tokio::time::sleep(self.config.poll_interval * 4).await;
                }
            }
        }
    }

    /// Claim and process at most one job. Returns whether a job was seen.
    pub async fn poll_once(&self) -> MessagingResult<bool> {
        let message: Option<pgmq::types::Message<serde_json::Value>> = self
            .queue
            .read(
                &self.config.request_queue,
                Some(self.config.visibility_timeout_seconds),
            )
            .await
            .map_err(|e| MessagingError::connection(e.to_string()))?;

        let Some(message) = message else {
            return Ok(false);
        };

        let msg_id = message.msg_id;

        match serde_json::from_value::<JobMessage>(message.message) {
            Ok(job) => self.process_job(msg_id, job).await,
            Err(e) => {
                warn!(msg_id, error = %e, "Archiving malformed job message");
                self.archive(msg_id).await;
            }
        }

        Ok(true)
    }

    async fn process_job(&self, msg_id: i64, job: JobMessage) {
        if job.is_expired(chrono::Utc::now()) {
            debug!(
                msg_id,
                correlation_id = %job.correlation_id,
                "Job expired before execution, archiving"
            );
            self.archive(msg_id).await;
            return;
        }

        debug!(
            msg_id,
            correlation_id = %job.correlation_id,
            reply_to = %job.reply_to,
            "Running prediction job"
        );

        let started = Instant::now();
        let outcome = self.handler.predict(&job.payload).await;
        let execution_time_ms = started.elapsed().as_millis() as i64;

        let reply = if outcome.success {
            ReplyMessage::success(
                job.correlation_id,
                outcome.output_data.unwrap_or_default(),
                outcome.metrics,
                Some(execution_time_ms),
            )
        } else {
            ReplyMessage::failure(
                job.correlation_id,
                outcome.error.unwrap_or_else(|| "Unknown error".to_string()),
                Some(execution_time_ms),
            )
        };

        // The caller may have timed out and dropped its reply queue; that
        // race is expected and the reply is simply lost.
        if let Err(e) = self.queue.send(&job.reply_to, &reply).await {
            warn!(
                msg_id,
                correlation_id = %job.correlation_id,
                reply_to = %job.reply_to,
                error = %e,
                "Reply undeliverable, dropping"
            );
        }

        if let Err(e) = self.queue.delete(&self.config.request_queue, msg_id).await {
            warn!(msg_id, error = %e, "Failed to delete processed job");
        }
    }

    async fn archive(&self, msg_id: i64) {
        if let Err(e) = self.queue.archive(&self.config.request_queue, msg_id).await {
            warn!(msg_id, error = %e, "Failed to archive job message");
        }
    }
}
