//! Attribute dimensions - the closed set of axes options are evaluated on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value stored for a dimension the backend did not provide, or provided
/// as something that is not a number.
pub const DEFAULT_DIMENSION_VALUE: f64 = 0.5;

/// A named evaluation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeDimension {
    /// Long-term potential gain.
    Upside,
    /// Security and predictability.
    Stability,
    /// Freedom and adaptability.
    Flexibility,
    /// Skill development potential.
    LearningValue,
    /// Required workload intensity.
    Effort,
    /// Stress burden.
    EmotionalCost,
}

impl AttributeDimension {
    /// Every dimension, in wire order.
    pub const ALL: [AttributeDimension; 6] = [
        AttributeDimension::Upside,
        AttributeDimension::Stability,
        AttributeDimension::Flexibility,
        AttributeDimension::LearningValue,
        AttributeDimension::Effort,
        AttributeDimension::EmotionalCost,
    ];

    /// Returns the wire name (the key used in an option's `dimensions` map).
    pub fn name(&self) -> &'static str {
        match self {
            AttributeDimension::Upside => "UPSIDE",
            AttributeDimension::Stability => "STABILITY",
            AttributeDimension::Flexibility => "FLEXIBILITY",
            AttributeDimension::LearningValue => "LEARNING_VALUE",
            AttributeDimension::Effort => "EFFORT",
            AttributeDimension::EmotionalCost => "EMOTIONAL_COST",
        }
    }

    /// Looks up a dimension by wire name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dimension| dimension.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for AttributeDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalizes a raw dimension value into [0.0, 1.0].
///
/// Non-finite input becomes [`DEFAULT_DIMENSION_VALUE`]; finite input outside
/// the range is clamped to the nearest bound. In-range values pass through
/// untouched.
pub fn normalize_dimension_value(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        DEFAULT_DIMENSION_VALUE
    }
}
