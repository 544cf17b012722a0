//! # Web API Error Types
//!
//! Error types specific to the web API and their HTTP response conversions.
//! Leverages thiserror for structured error handling and Axum's
//! IntoResponse for HTTP conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::orchestration::OrchestrationError;
use crate::services::{ServiceError, StoreError};

/// Web API errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found")]
    NotFound,

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Upstream timeout")]
    GatewayTimeout,

    #[error("Database operation failed: {operation}")]
    DatabaseError { operation: String },

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Create a BadRequest error with a custom message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a Conflict error with a custom message
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a DatabaseError with operation context
    pub fn database_error(operation: impl Into<String>) -> Self {
        Self::DatabaseError {
            operation: operation.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_code, message) = match &self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found"),

            ApiError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message.as_str())
            }

            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required",
            ),

            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied"),

            ApiError::Conflict { message } => (StatusCode::CONFLICT, "CONFLICT", message.as_str()),

            ApiError::GatewayTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "GATEWAY_TIMEOUT",
                "Upstream timeout",
            ),

            ApiError::DatabaseError { operation } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                operation.as_str(),
            ),

            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status_code, body).into_response()
    }
}

impl From<OrchestrationError> for ApiError {
    fn from(err: OrchestrationError) -> Self {
        match err {
            OrchestrationError::Validation(message) => ApiError::BadRequest { message },
            OrchestrationError::NotFound { .. } => ApiError::NotFound,
            OrchestrationError::Timeout { .. } => ApiError::GatewayTimeout,
            OrchestrationError::InvalidTransition(inner) => ApiError::conflict(inner.to_string()),
            // Connection and unexpected messaging errors surface as plain
            // server errors; the record is already terminally failed.
            OrchestrationError::Connection(_)
            | OrchestrationError::Database(_)
            | OrchestrationError::Internal(_) => ApiError::Internal,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => ApiError::NotFound,
            ServiceError::Conflict(message) => ApiError::Conflict { message },
            ServiceError::InvalidCredentials => ApiError::Unauthorized,
            ServiceError::InsufficientFunds => ApiError::bad_request("insufficient funds"),
            ServiceError::Validation(message) => ApiError::BadRequest { message },
            ServiceError::Database(e) => ApiError::database_error(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound,
            StoreError::InvalidTransition(inner) => ApiError::conflict(inner.to_string()),
            StoreError::Database(e) => ApiError::database_error(e.to_string()),
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::MessagingError;

    #[test]
    fn test_orchestration_error_mapping() {
        let timeout: OrchestrationError = MessagingError::timeout("send_request", 30).into();
        assert!(matches!(ApiError::from(timeout), ApiError::GatewayTimeout));

        let not_found = OrchestrationError::NotFound {
            entity: "model",
            id: 7,
        };
        assert!(matches!(ApiError::from(not_found), ApiError::NotFound));

        let connection: OrchestrationError = MessagingError::connection("refused").into();
        assert!(matches!(ApiError::from(connection), ApiError::Internal));
    }
}
