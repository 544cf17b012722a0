//! Orchestration error taxonomy.
//!
//! Timeout and connection failures stay distinct all the way to the HTTP
//! layer: a timeout is a gateway-kind error (the outcome is genuinely
//! unknown), a connection failure is a server error the caller may retry
//! as a whole new operation.

use thiserror::Error;

use crate::messaging::MessagingError;
use crate::services::StoreError;
use crate::state_machine::StateMachineError;

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("prediction timed out after {timeout_seconds}s")]
    Timeout { timeout_seconds: u64 },

    #[error("queue connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    InvalidTransition(StateMachineError),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<MessagingError> for OrchestrationError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::Timeout {
                timeout_seconds, ..
            } => OrchestrationError::Timeout { timeout_seconds },
            MessagingError::Connection { message } => OrchestrationError::Connection(message),
            MessagingError::QueueOperation { .. } => OrchestrationError::Connection(err.to_string()),
            other => OrchestrationError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for OrchestrationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => OrchestrationError::NotFound { entity, id },
            StoreError::InvalidTransition(inner) => OrchestrationError::InvalidTransition(inner),
            StoreError::Database(inner) => OrchestrationError::Database(inner.to_string()),
        }
    }
}
