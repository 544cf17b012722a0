//! # Worker
//!
//! Consumes the shared job queue, runs the (opaque) prediction handler, and
//! answers on each job's private reply queue using the job's correlation
//! token.

pub mod consumer;
pub mod handler;

pub use consumer::{ConsumerConfig, PredictionConsumer};
pub use handler::{EchoHandler, PredictionHandler, PredictionOutcome};
