//! Local confidence scoring configuration

use serde::Deserialize;

use crate::domain::analysis::ConfidenceInputs;

use super::error::ValidationError;

/// Fixed confidence factors until the backend reports its own
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_input_completeness")]
    pub input_completeness: f64,

    #[serde(default = "default_constraint_clarity")]
    pub constraint_clarity: f64,
}

impl ScoringConfig {
    /// Get the factors in the form the calculator takes
    pub fn confidence_inputs(&self) -> ConfidenceInputs {
        ConfidenceInputs {
            input_completeness: self.input_completeness,
            constraint_clarity: self.constraint_clarity,
        }
    }

    /// Validate scoring configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_unit(self.input_completeness) {
            return Err(ValidationError::InvalidConfidenceFactor("input_completeness"));
        }
        if !is_unit(self.constraint_clarity) {
            return Err(ValidationError::InvalidConfidenceFactor("constraint_clarity"));
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            input_completeness: default_input_completeness(),
            constraint_clarity: default_constraint_clarity(),
        }
    }
}

fn is_unit(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn default_input_completeness() -> f64 {
    0.7
}

fn default_constraint_clarity() -> f64 {
    0.8
}
