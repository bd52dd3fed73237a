//! Typed decision stream events.

use serde::Serialize;
use std::fmt;

use crate::domain::decision::DecisionOption;

/// Which audit list an `audit:*` list event replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditListKind {
    KeyFactors,
    Assumptions,
    ReversalTriggers,
}

impl AuditListKind {
    /// Returns the wire tag of the event carrying this list.
    pub fn event_name(&self) -> &'static str {
        match self {
            AuditListKind::KeyFactors => "audit:key_factors",
            AuditListKind::Assumptions => "audit:assumptions",
            AuditListKind::ReversalTriggers => "audit:reversal_triggers",
        }
    }
}

impl fmt::Display for AuditListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// The aggregate, authoritative audit delivered by `decision_audit`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DecisionAudit {
    pub final_recommendation: Option<String>,
    /// Clamped to [0, 1].
    pub confidence: Option<f64>,
    pub key_factors: Vec<String>,
    pub assumptions: Vec<String>,
    pub reversal_triggers: Vec<String>,
}

/// One decoded event from the decision stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DecisionStreamEvent {
    StatusUpdate(String),
    OptionReceived(DecisionOption),
    /// Exploratory, non-authoritative recommendation.
    RecommendationText(String),
    AuditList {
        kind: AuditListKind,
        items: Vec<String>,
    },
    AuditRecommendation(String),
    /// Clamped to [0, 1].
    AuditConfidence(f64),
    DecisionAudit(DecisionAudit),
    StreamError(String),
    StreamDone,
}

impl DecisionStreamEvent {
    /// Returns a short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            DecisionStreamEvent::StatusUpdate(_) => "status",
            DecisionStreamEvent::OptionReceived(_) => "option",
            DecisionStreamEvent::RecommendationText(_) => "recommendation",
            DecisionStreamEvent::AuditList { kind, .. } => kind.event_name(),
            DecisionStreamEvent::AuditRecommendation(_) => "audit:recommendation",
            DecisionStreamEvent::AuditConfidence(_) => "audit:confidence",
            DecisionStreamEvent::DecisionAudit(_) => "decision_audit",
            DecisionStreamEvent::StreamError(_) => "error",
            DecisionStreamEvent::StreamDone => "done",
        }
    }

    /// Returns true for `done` and `error`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DecisionStreamEvent::StreamError(_) | DecisionStreamEvent::StreamDone
        )
    }
}
