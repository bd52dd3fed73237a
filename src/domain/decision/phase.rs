//! Session phase - lifecycle of one evaluation stream.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Phase of a decision session.
///
/// ```text
/// Idle ──submit──▶ Streaming ──done──▶ Completed
///  ▲                  │ └────error───▶ Failed
///  └─────cancel───────┘
/// ```
///
/// `Completed` and `Failed` end a subscription; a fresh submit from either
/// starts a new one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Streaming,
    Completed,
    Failed,
}

impl SessionPhase {
    /// Returns true while stream events are being applied.
    pub fn is_streaming(&self) -> bool {
        matches!(self, SessionPhase::Streaming)
    }
}

impl StateMachine for SessionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (Idle, Streaming)
                | (Streaming, Completed)
                | (Streaming, Failed)
                | (Streaming, Idle)
                | (Completed, Streaming)
                | (Completed, Idle)
                | (Failed, Streaming)
                | (Failed, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            Idle => vec![Streaming],
            Streaming => vec![Completed, Failed, Idle],
            Completed => vec![Streaming, Idle],
            Failed => vec![Streaming, Idle],
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Streaming => "streaming",
            SessionPhase::Completed => "completed",
            SessionPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}
