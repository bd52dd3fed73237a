//! Decision module - options, context, session phase and the audit snapshot.

mod context;
mod dimension;
mod option;
mod phase;
mod state;

pub use context::{ContextField, DecisionContext};
pub use dimension::{normalize_dimension_value, AttributeDimension, DEFAULT_DIMENSION_VALUE};
pub use option::{DecisionOption, RiskLabel};
pub use phase::SessionPhase;
pub use state::DecisionAuditState;
