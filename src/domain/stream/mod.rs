//! Stream module - the closed set of decision stream events and their codec.

mod codec;
mod events;

pub use codec::{DecodeError, EventCodec};
pub use events::{AuditListKind, DecisionAudit, DecisionStreamEvent};
