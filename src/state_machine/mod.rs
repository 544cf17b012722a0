// State machine for prediction request lifecycle management.
//
// The status column on `prediction_requests` is a closed enum; every write
// that changes it goes through the transition table here, so a terminal
// record can never silently move back to pending.

pub mod errors;
pub mod events;
pub mod request_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use events::RequestEvent;
pub use request_state_machine::determine_target_state;
pub use states::RequestStatus;
