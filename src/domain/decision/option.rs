//! Decision options and their risk labels.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::dimension::{normalize_dimension_value, AttributeDimension, DEFAULT_DIMENSION_VALUE};

/// Risk label attached to an option by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLabel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLabel {
    /// Parses a label, ignoring case and surrounding whitespace.
    /// Anything unrecognized is `Unknown`.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("low") {
            RiskLabel::Low
        } else if label.eq_ignore_ascii_case("medium") {
            RiskLabel::Medium
        } else if label.eq_ignore_ascii_case("high") {
            RiskLabel::High
        } else {
            RiskLabel::Unknown
        }
    }

    /// Returns the risk level scalar used by scoring.
    pub fn level(&self) -> f64 {
        match self {
            RiskLabel::Low => 0.2,
            RiskLabel::Medium => 0.5,
            RiskLabel::High => 0.8,
            RiskLabel::Unknown => 0.5,
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLabel::Low => "low",
            RiskLabel::Medium => "medium",
            RiskLabel::High => "high",
            RiskLabel::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One candidate outcome of a decision.
///
/// Dimension values are normalized on the way in, so every stored value is
/// within [0.0, 1.0]. The only field that changes after construction is the
/// computed score, and [`DecisionOption::with_score`] returns a new value
/// rather than mutating the existing one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionOption {
    pub id: String,
    pub title: String,
    pub description: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    /// Raw label as received from the backend.
    pub risk: String,
    risk_level: f64,
    dimensions: BTreeMap<AttributeDimension, f64>,
    computed_score: Option<f64>,
}

impl DecisionOption {
    /// Creates an option with the given title and no other data.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            description: String::new(),
            pros: Vec::new(),
            cons: Vec::new(),
            risk: String::new(),
            risk_level: RiskLabel::Unknown.level(),
            dimensions: BTreeMap::new(),
            computed_score: None,
        }
    }

    /// Sets the backend-assigned identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the pros.
    pub fn with_pros(mut self, pros: Vec<String>) -> Self {
        self.pros = pros;
        self
    }

    /// Sets the cons.
    pub fn with_cons(mut self, cons: Vec<String>) -> Self {
        self.cons = cons;
        self
    }

    /// Sets the risk label and derives the risk level from it.
    pub fn with_risk(mut self, label: impl Into<String>) -> Self {
        self.risk = label.into();
        self.risk_level = RiskLabel::parse(&self.risk).level();
        self
    }

    /// Sets one dimension value, normalizing it into [0.0, 1.0].
    pub fn with_dimension(mut self, dimension: AttributeDimension, value: f64) -> Self {
        self.dimensions
            .insert(dimension, normalize_dimension_value(value));
        self
    }

    /// Fills every dimension that has no value with the 0.5 default.
    pub fn with_default_dimensions(mut self) -> Self {
        for dimension in AttributeDimension::ALL {
            self.dimensions
                .entry(dimension)
                .or_insert(DEFAULT_DIMENSION_VALUE);
        }
        self
    }

    /// Returns a copy of this option carrying the given score.
    pub fn with_score(&self, score: f64) -> Self {
        Self {
            computed_score: Some(score),
            ..self.clone()
        }
    }

    /// Returns the risk level scalar in [0.0, 1.0].
    pub fn risk_level(&self) -> f64 {
        self.risk_level
    }

    /// Returns the stored value for a dimension, if any.
    pub fn dimension(&self, dimension: AttributeDimension) -> Option<f64> {
        self.dimensions.get(&dimension).copied()
    }

    /// Returns all stored dimension values.
    pub fn dimensions(&self) -> &BTreeMap<AttributeDimension, f64> {
        &self.dimensions
    }

    /// Returns the score from the latest ranking pass, if any.
    pub fn computed_score(&self) -> Option<f64> {
        self.computed_score
    }
}
