//! State machine trait for lifecycle enums.
//!
//! Lifecycle enums declare their legal edges once; callers move between
//! states through [`StateMachine::transition_to`] and get a
//! [`ValidationError`] for anything the table does not allow.

use super::ValidationError;

/// Trait for enums whose values form a finite state machine.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from self to target is a legal edge.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all states reachable from the current one in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs the transition, or reports the illegal edge.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }
}
