//! Transition table for the prediction request lifecycle.
//!
//! Allowed transitions:
//!
//! ```text
//! pending ──start──▶ processing ──complete──▶ completed
//!    │                    │
//!    ├────fail────────────┴──fail──▶ failed
//!    └────cancel──▶ cancelled (also from processing)
//! ```
//!
//! `pending → failed` is deliberately direct: a timeout or a broker
//! connection failure terminates a request that no worker ever started.
//! Terminal states reject every event.

use super::errors::{StateMachineError, StateMachineResult};
use super::events::RequestEvent;
use super::states::RequestStatus;

/// Determine the target state for an event, or reject the transition.
pub fn determine_target_state(
    current: RequestStatus,
    event: &RequestEvent,
) -> StateMachineResult<RequestStatus> {
    let target = match (current, event) {
        // Start transitions
        (RequestStatus::Pending, RequestEvent::Start) => RequestStatus::Processing,

        // Complete transitions
        (RequestStatus::Pending, RequestEvent::Complete) => RequestStatus::Completed,
        (RequestStatus::Processing, RequestEvent::Complete) => RequestStatus::Completed,

        // Failure transitions
        (RequestStatus::Pending, RequestEvent::Fail(_)) => RequestStatus::Failed,
        (RequestStatus::Processing, RequestEvent::Fail(_)) => RequestStatus::Failed,

        // Cancel transitions
        (RequestStatus::Pending, RequestEvent::Cancel) => RequestStatus::Cancelled,
        (RequestStatus::Processing, RequestEvent::Cancel) => RequestStatus::Cancelled,

        // Everything else (including any event against a terminal state)
        (from, event) => {
            return Err(StateMachineError::InvalidTransition {
                from,
                event: event.event_type(),
            })
        }
    };

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert_eq!(
            determine_target_state(RequestStatus::Pending, &RequestEvent::Start).unwrap(),
            RequestStatus::Processing
        );
        assert_eq!(
            determine_target_state(RequestStatus::Pending, &RequestEvent::Complete).unwrap(),
            RequestStatus::Completed
        );
        assert_eq!(
            determine_target_state(
                RequestStatus::Pending,
                &RequestEvent::Fail("timed out".to_string())
            )
            .unwrap(),
            RequestStatus::Failed
        );
        assert_eq!(
            determine_target_state(RequestStatus::Processing, &RequestEvent::Complete).unwrap(),
            RequestStatus::Completed
        );
    }

    #[test]
    fn test_terminal_states_reject_all_events() {
        for terminal in [
            RequestStatus::Completed,
            RequestStatus::Failed,
            RequestStatus::Cancelled,
        ] {
            for event in [
                RequestEvent::Start,
                RequestEvent::Complete,
                RequestEvent::Fail("boom".to_string()),
                RequestEvent::Cancel,
            ] {
                let result = determine_target_state(terminal, &event);
                assert!(
                    matches!(
                        result,
                        Err(StateMachineError::InvalidTransition { from, .. }) if from == terminal
                    ),
                    "{terminal} should reject {}",
                    event.event_type()
                );
            }
        }
    }

    #[test]
    fn test_cannot_restart_processing() {
        assert!(determine_target_state(RequestStatus::Processing, &RequestEvent::Start).is_err());
    }
}
