//! Service layer: the record-store contract the orchestrator depends on,
//! plus account, billing, catalog, and chat-session services.

pub mod model_service;
pub mod request_store;
pub mod session_store;
pub mod transaction_service;
pub mod user_service;

pub use model_service::{ModelCatalog, ModelService};
pub use request_store::{PgRequestStore, RequestStore, StoreError};
pub use session_store::{ChatEntry, InMemorySessionStore, SessionStore};
pub use transaction_service::TransactionService;
pub use user_service::UserService;

use thiserror::Error;

/// Errors surfaced by the account/billing/catalog services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
