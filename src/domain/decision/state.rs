//! Externally observable snapshot of a decision session.

use serde::Serialize;

use super::{DecisionContext, DecisionOption, SessionPhase};

/// Immutable view of everything the presentation layer may render.
///
/// Snapshots are replaced wholesale on every transition; nothing hands out a
/// mutable reference to one.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DecisionAuditState {
    pub decision_text: String,
    pub constraints: Vec<String>,
    pub phase: SessionPhase,
    /// True from submit until `decision_audit`, `done` or `error` arrives.
    pub is_loading: bool,
    pub context: DecisionContext,
    /// Accumulated options, ranked for the current context.
    pub options: Vec<DecisionOption>,
    /// Exploratory recommendation streamed before the audit.
    pub recommendation: Option<String>,
    /// Audit-authoritative recommendation.
    pub final_recommendation: Option<String>,
    /// Confidence reported by the backend audit.
    pub confidence: Option<f64>,
    /// Confidence computed locally from the ranked options.
    pub confidence_score: Option<f64>,
    pub key_factors: Vec<String>,
    pub assumptions: Vec<String>,
    pub reversal_triggers: Vec<String>,
    pub status_message: Option<String>,
    pub error: Option<String>,
}

impl DecisionAuditState {
    /// Creates the initial state for a session with the given context.
    pub fn with_context(context: DecisionContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Returns the recommendation to display: the audit one wins over the
    /// exploratory one.
    pub fn display_recommendation(&self) -> Option<&str> {
        self.final_recommendation
            .as_deref()
            .or(self.recommendation.as_deref())
    }
}
