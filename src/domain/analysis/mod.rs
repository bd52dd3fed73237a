//! Analysis Module - Pure domain services for option ranking.
//!
//! # Components
//!
//! - `ScoringEngine` - Context-weighted scoring and stable ranking of options
//! - `ConfidenceCalculator` - Confidence from input quality and score separation
//!
//! All functions are pure (no side effects) and stateless. They take domain
//! objects as input and return computed results, so the same inputs always
//! produce the same ranking.

mod confidence_calculator;
mod scoring_engine;

pub use confidence_calculator::{
    ConfidenceCalculator, ConfidenceInputs, NEUTRAL_SEPARATION, SEPARATION_EPSILON,
};
pub use scoring_engine::{ContextPreference, ScoringEngine, ScoringProfile};
