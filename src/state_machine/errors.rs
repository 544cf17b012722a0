use crate::state_machine::states::RequestStatus;
use thiserror::Error;

/// Errors raised while resolving or applying a state transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    #[error("invalid transition from {from} on event {event}")]
    InvalidTransition {
        from: RequestStatus,
        event: &'static str,
    },

    #[error("state machine internal error: {0}")]
    Internal(String),
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;
