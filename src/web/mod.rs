//! # Web API
//!
//! Axum HTTP surface: thin controllers over the service layer and the
//! prediction orchestrator.

pub mod auth;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use errors::{ApiError, ApiResult};
pub use routes::build_router;
pub use state::AppState;
