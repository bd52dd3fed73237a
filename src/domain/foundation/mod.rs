//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, the state machine trait and error types
//! that form the vocabulary of the decision audit domain.

mod errors;
mod priority_level;
mod state_machine;

pub use errors::ValidationError;
pub use priority_level::PriorityLevel;
pub use state_machine::StateMachine;
