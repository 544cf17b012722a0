use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states for a prediction request record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
pub enum RequestStatus {
    /// Initial state when the record is created
    Pending,
    /// Job handed to a worker (informational, set by operational tooling)
    Processing,
    /// Reply received with a success flag; output and cost recorded
    Completed,
    /// Reply reported failure, or the queue leg timed out / errored
    Failed,
    /// Request was cancelled
    Cancelled,
}

impl RequestStatus {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Check if this is an active state (a worker holds the job)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Processing)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid request status: {s}")),
        }
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_check() {
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Failed.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Processing.is_terminal());
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(RequestStatus::Processing.to_string(), "processing");
        assert_eq!(
            "completed".parse::<RequestStatus>().unwrap(),
            RequestStatus::Completed
        );
        assert!("done".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_serde() {
        let status = RequestStatus::Failed;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"failed\"");

        let parsed: RequestStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, status);
    }
}
