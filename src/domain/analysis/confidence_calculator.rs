//! Confidence Calculator - Blends input quality and ranking separation.

use serde::{Deserialize, Serialize};

use crate::domain::decision::DecisionOption;

/// Separation reported when fewer than two options are ranked.
pub const NEUTRAL_SEPARATION: f64 = 0.5;

/// Floor for the separation denominator.
pub const SEPARATION_EPSILON: f64 = 1e-9;

/// Externally supplied confidence factors.
///
/// Both default to fixed values until the backend reports them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInputs {
    pub input_completeness: f64,
    pub constraint_clarity: f64,
}

impl Default for ConfidenceInputs {
    fn default() -> Self {
        Self {
            input_completeness: 0.7,
            constraint_clarity: 0.8,
        }
    }
}

/// Calculator for the local confidence score.
pub struct ConfidenceCalculator;

impl ConfidenceCalculator {
    /// Computes confidence = 0.4×completeness + 0.3×clarity + 0.3×separation,
    /// clamped to [0, 1].
    pub fn compute(input_completeness: f64, constraint_clarity: f64, score_separation: f64) -> f64 {
        let raw = 0.4 * input_completeness + 0.3 * constraint_clarity + 0.3 * score_separation;
        raw.clamp(0.0, 1.0)
    }

    /// Measures how clearly the top option beats the runner-up.
    ///
    /// # Edge Cases
    /// - Fewer than 2 options: [`NEUTRAL_SEPARATION`]
    /// - Both scores zero: denominator floors at [`SEPARATION_EPSILON`], giving 0
    /// - Unscored options count as 0
    pub fn score_separation(ranked: &[DecisionOption]) -> f64 {
        let (top, second) = match ranked {
            [top, second, ..] => (
                top.computed_score().unwrap_or(0.0),
                second.computed_score().unwrap_or(0.0),
            ),
            _ => return NEUTRAL_SEPARATION,
        };

        let denominator = top.abs().max(second.abs()).max(SEPARATION_EPSILON);
        let separation = (top - second).abs() / denominator;

        if separation.is_nan() {
            NEUTRAL_SEPARATION
        } else {
            separation.clamp(0.0, 1.0)
        }
    }

    /// Computes confidence for a ranked option list.
    pub fn for_ranking(inputs: &ConfidenceInputs, ranked: &[DecisionOption]) -> f64 {
        Self::compute(
            inputs.input_completeness,
            inputs.constraint_clarity,
            Self::score_separation(ranked),
        )
    }
}
