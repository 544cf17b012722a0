//! Wire message types for the job queue and the per-call reply queues.
//!
//! pgmq carries plain JSON bodies with no broker-level headers, so the
//! reply destination, correlation token, and expiration ride inside the
//! job envelope rather than as message metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Inference input as the worker sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPayload {
    pub text: String,
}

impl JobPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One job published to the shared request queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMessage {
    /// Unique per in-flight request; echoed back in the reply
    pub correlation_id: Uuid,
    /// Name of the private reply queue scoped to this call
    pub reply_to: String,
    /// Job time-to-live; consumers must not start work past it
    pub expiration_ms: u64,
    pub enqueued_at: DateTime<Utc>,
    pub payload: JobPayload,
}

impl JobMessage {
    pub fn new(
        correlation_id: Uuid,
        reply_to: impl Into<String>,
        payload: JobPayload,
        timeout: Duration,
    ) -> Self {
        Self {
            correlation_id,
            reply_to: reply_to.into(),
            expiration_ms: timeout.as_millis() as u64,
            enqueued_at: Utc::now(),
            payload,
        }
    }

    /// Whether the caller's deadline has already passed.
    ///
    /// pgmq has no broker-side message TTL; expiry is enforced at
    /// consumption, which preserves the caller-side semantics (a late
    /// reply would be unroutable anyway once the reply queue is gone).
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let deadline = self.enqueued_at + chrono::Duration::milliseconds(self.expiration_ms as i64);
        now > deadline
    }
}

/// Worker response delivered on the private reply queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyMessage {
    /// Must match the job's token for the reply to be accepted
    pub correlation_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<i64>,
}

impl ReplyMessage {
    pub fn success(
        correlation_id: Uuid,
        output_data: impl Into<String>,
        metrics: Option<serde_json::Value>,
        execution_time_ms: Option<i64>,
    ) -> Self {
        Self {
            correlation_id,
            success: true,
            output_data: Some(output_data.into()),
            error: None,
            metrics,
            execution_time_ms,
        }
    }

    pub fn failure(
        correlation_id: Uuid,
        error: impl Into<String>,
        execution_time_ms: Option<i64>,
    ) -> Self {
        Self {
            correlation_id,
            success: false,
            output_data: None,
            error: Some(error.into()),
            metrics: None,
            execution_time_ms,
        }
    }

    /// The error text, with the contract's fallback for silent failures
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("Unknown error")
    }
}
