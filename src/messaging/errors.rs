//! # Messaging Error Types
//!
//! Structured error handling for the messaging system using thiserror.
//! Timeouts and connection failures are distinct kinds on purpose: callers
//! may retry a connection failure with backoff, while a timed-out request
//! may still complete worker-side and should not be blindly retried.

use thiserror::Error;

/// Messaging error taxonomy
#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Broker connection error: {message}")]
    Connection { message: String },

    #[error("Queue operation failed: {queue_name}: {operation}: {message}")]
    QueueOperation {
        queue_name: String,
        operation: String,
        message: String,
    },

    #[error("Message serialization error: {message}")]
    MessageSerialization { message: String },

    #[error("Message deserialization error: {message}")]
    MessageDeserialization { message: String },

    #[error("No reply received: operation {operation} timed out after {timeout_seconds}s")]
    Timeout {
        operation: String,
        timeout_seconds: u64,
    },

    #[error("Internal messaging error: {message}")]
    Internal { message: String },
}

impl MessagingError {
    /// Create a broker connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a queue operation error
    pub fn queue_operation(
        queue_name: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::QueueOperation {
            queue_name: queue_name.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_seconds: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_seconds,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error is the no-reply-within-deadline kind
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Conversion from sqlx::Error to MessagingError
impl From<sqlx::Error> for MessagingError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => MessagingError::connection("Database pool timed out"),
            sqlx::Error::PoolClosed => MessagingError::connection("Database pool is closed"),
            _ => MessagingError::connection(err.to_string()),
        }
    }
}

/// Conversion from serde_json::Error to MessagingError
impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() {
            MessagingError::MessageDeserialization {
                message: err.to_string(),
            }
        } else {
            MessagingError::MessageSerialization {
                message: err.to_string(),
            }
        }
    }
}

/// Conversion from pgmq::errors::PgmqError to MessagingError
impl From<pgmq::errors::PgmqError> for MessagingError {
    fn from(err: pgmq::errors::PgmqError) -> Self {
        MessagingError::connection(err.to_string())
    }
}

/// Result type alias for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let conn_err = MessagingError::connection("Connection refused");
        assert!(matches!(conn_err, MessagingError::Connection { .. }));
        assert!(!conn_err.is_timeout());

        let timeout_err = MessagingError::timeout("send_request", 30);
        assert!(timeout_err.is_timeout());
    }

    #[test]
    fn test_error_display() {
        let timeout_err = MessagingError::timeout("send_request", 30);
        let display_str = format!("{timeout_err}");
        assert!(display_str.contains("send_request"));
        assert!(display_str.contains("30"));

        let queue_err = MessagingError::queue_operation("ml_requests", "send", "boom");
        let display_str = format!("{queue_err}");
        assert!(display_str.contains("ml_requests"));
        assert!(display_str.contains("send"));
    }

    #[test]
    fn test_sqlx_conversion() {
        let err: MessagingError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, MessagingError::Connection { .. }));
    }
}
