//! Application layer - The reducer and the session that drives it.
//!
//! `DecisionStreamReducer` is the pure, synchronous state machine;
//! `DecisionSession` wraps it in a synchronized cell, runs the stream
//! subscription and publishes snapshots.

mod reducer;
mod session;

pub use reducer::{
    DecisionStreamReducer, SubmitRejection, STREAM_ERROR_MESSAGE, TRANSPORT_FAILURE_MESSAGE,
};
pub use session::{DecisionSession, SubmitOutcome, SubscriptionId};
