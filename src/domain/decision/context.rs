//! The user's priority vector driving re-ranking.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::PriorityLevel;

/// Current priorities and sensitivities, each on a 1-5 scale.
///
/// Values are always within range: every setter clamps. Changes produce a
/// new context rather than mutating the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct DecisionContext {
    pub growth_priority: PriorityLevel,
    pub stability_priority: PriorityLevel,
    pub flexibility_priority: PriorityLevel,
    pub learning_priority: PriorityLevel,
    pub risk_tolerance: PriorityLevel,
    /// 1 = calm, 5 = highly stressed.
    pub emotional_stress: PriorityLevel,
}

/// One independently settable field of [`DecisionContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    GrowthPriority,
    StabilityPriority,
    FlexibilityPriority,
    LearningPriority,
    RiskTolerance,
    EmotionalStress,
}

impl ContextField {
    /// Every field, in declaration order.
    pub const ALL: [ContextField; 6] = [
        ContextField::GrowthPriority,
        ContextField::StabilityPriority,
        ContextField::FlexibilityPriority,
        ContextField::LearningPriority,
        ContextField::RiskTolerance,
        ContextField::EmotionalStress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextField::GrowthPriority => "growth_priority",
            ContextField::StabilityPriority => "stability_priority",
            ContextField::FlexibilityPriority => "flexibility_priority",
            ContextField::LearningPriority => "learning_priority",
            ContextField::RiskTolerance => "risk_tolerance",
            ContextField::EmotionalStress => "emotional_stress",
        }
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DecisionContext {
    /// Returns a new context with one field replaced. The value is clamped
    /// to [1, 5].
    pub fn with_field(&self, field: ContextField, value: i32) -> Self {
        let level = PriorityLevel::new(value);
        let mut next = *self;
        match field {
            ContextField::GrowthPriority => next.growth_priority = level,
            ContextField::StabilityPriority => next.stability_priority = level,
            ContextField::FlexibilityPriority => next.flexibility_priority = level,
            ContextField::LearningPriority => next.learning_priority = level,
            ContextField::RiskTolerance => next.risk_tolerance = level,
            ContextField::EmotionalStress => next.emotional_stress = level,
        }
        next
    }
}
