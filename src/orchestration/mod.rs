//! # Orchestration
//!
//! The saga coordinating a single prediction request across persistence and
//! messaging: create a pending record, run the queue round-trip, and drive
//! the record to a terminal state no matter how the messaging leg ends.

pub mod errors;
pub mod orchestrator;

pub use errors::OrchestrationError;
pub use orchestrator::{PredictionInput, PredictionOrchestrator};
