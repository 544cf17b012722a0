#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # mlserve core
//!
//! Backend core for the mlserve prediction platform: user accounts, balances
//! and transactions, an ML model catalog, and the request orchestrator that
//! decouples synchronous HTTP prediction calls from an asynchronous worker
//! pool behind a durable message queue.
//!
//! ## Architecture
//!
//! The centerpiece is the **request/response correlation layer** over pgmq:
//! the HTTP handler asks [`orchestration::PredictionOrchestrator`] to process
//! a prediction, which persists a `pending` request record, publishes a job
//! with a fresh correlation token and a per-call reply queue, waits for the
//! matching reply (or a timeout), and drives the record to a terminal state.
//! Workers consume the shared job queue and answer on the reply queue using
//! the same correlation token.
//!
//! ## Module Organization
//!
//! - [`models`] - SQLx data layer (users, models, transactions, requests)
//! - [`state_machine`] - Request lifecycle states and transition rules
//! - [`messaging`] - pgmq queue client, wire messages, and error taxonomy
//! - [`orchestration`] - The prediction request saga
//! - [`services`] - Record store, account/billing/catalog services
//! - [`worker`] - Job queue consumer and the opaque prediction handler seam
//! - [`web`] - Axum HTTP surface
//! - [`database`] - Connection management and schema migrations
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Crate-level error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mlserve_core::config::MlServeConfig;
//! use mlserve_core::messaging::QueueClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MlServeConfig::from_env()?;
//! let queue = QueueClient::new(config.database_url.clone(), config.request_queue.clone());
//! queue.connect().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod orchestration;
pub mod services;
pub mod state_machine;
pub mod utils;
pub mod web;
pub mod worker;

// Re-export commonly used types at the crate root
pub use config::MlServeConfig;
pub use error::{MlServeError, Result};
pub use orchestration::{OrchestrationError, PredictionOrchestrator};
pub use state_machine::{RequestEvent, RequestStatus};
