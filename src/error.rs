use thiserror::Error;

/// Top-level error type for crate entry points (configuration, bootstrap).
///
/// The individual subsystems carry their own structured error enums
/// (`MessagingError`, `OrchestrationError`, `StoreError`); this type exists
/// for the places that have to aggregate across them.
#[derive(Debug, Error)]
pub enum MlServeError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error("Orchestration error: {0}")]
    Orchestration(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for MlServeError {
    fn from(err: sqlx::Error) -> Self {
        MlServeError::Database(err.to_string())
    }
}

impl From<crate::messaging::MessagingError> for MlServeError {
    fn from(err: crate::messaging::MessagingError) -> Self {
        MlServeError::Messaging(err.to_string())
    }
}

impl From<crate::orchestration::OrchestrationError> for MlServeError {
    fn from(err: crate::orchestration::OrchestrationError) -> Self {
        MlServeError::Orchestration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MlServeError>;
