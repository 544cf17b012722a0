//! # Messaging
//!
//! Request/reply messaging over pgmq: the wire message types, the error
//! taxonomy, and the queue client that implements RPC-over-broker with
//! correlation tokens and per-call reply queues.

pub mod errors;
pub mod message;
pub mod queue_client;

pub use errors::{MessagingError, MessagingResult};
pub use message::{JobMessage, JobPayload, ReplyMessage};
pub use queue_client::QueueClient;

use std::time::Duration;

/// The seam the orchestrator talks through: one-shot request/reply delivery.
///
/// Production uses [`QueueClient`]; tests substitute scripted
/// implementations.
#[async_trait::async_trait]
pub trait RequestQueue: Send + Sync {
    /// Publish `payload` to the shared job queue and wait up to `timeout`
    /// for the correlated reply.
    async fn send_request(
        &self,
        payload: JobPayload,
        timeout: Duration,
    ) -> MessagingResult<ReplyMessage>;
}
