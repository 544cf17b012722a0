//! The inference seam. Model execution is opaque to the queue plumbing:
//! a handler consumes a job payload and produces an outcome, nothing more.

use async_trait::async_trait;

use crate::messaging::JobPayload;

/// Result of running inference on one job
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub success: bool,
    pub output_data: Option<String>,
    pub error: Option<String>,
    pub metrics: Option<serde_json::Value>,
}

impl PredictionOutcome {
    pub fn success(output_data: impl Into<String>, metrics: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            output_data: Some(output_data.into()),
            error: None,
            metrics,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output_data: None,
            error: Some(error.into()),
            metrics: None,
        }
    }
}

/// Opaque model executor
#[async_trait]
pub trait PredictionHandler: Send + Sync {
    async fn predict(&self, payload: &JobPayload) -> PredictionOutcome;
}

/// Stand-in model for development and smoke tests: echoes the input back.
pub struct EchoHandler;

#[async_trait]
impl PredictionHandler for EchoHandler {
    async fn predict(&self, payload: &JobPayload) -> PredictionOutcome {
        PredictionOutcome::success(
            format!("echo: {}", payload.text),
            Some(serde_json::json!({ "model": "echo", "input_chars": payload.text.len() })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_handler() {
        let outcome = EchoHandler.predict(&JobPayload::new("hello")).await;
        assert!(outcome.success);
        assert_eq!(outcome.output_data.as_deref(), Some("echo: hello"));
        assert!(outcome.error.is_none());
    }
}
