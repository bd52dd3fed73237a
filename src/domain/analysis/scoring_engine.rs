//! Scoring Engine - Context-weighted option scoring and ranking.

use serde::Serialize;
use std::cmp::Ordering;

use crate::domain::decision::{AttributeDimension, DecisionContext, DecisionOption};

/// A dimension paired with the weight the current context gives it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContextPreference {
    pub dimension: AttributeDimension,
    pub weight: f64,
}

impl ContextPreference {
    pub fn new(dimension: AttributeDimension, weight: f64) -> Self {
        Self { dimension, weight }
    }
}

/// Everything scoring needs, derived from a [`DecisionContext`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringProfile {
    pub preferences: Vec<ContextPreference>,
    pub risk_sensitivity: f64,
    pub emotional_sensitivity: f64,
}

impl ScoringProfile {
    /// Derives preference weights and sensitivities from a context.
    ///
    /// # Derivation
    /// - UPSIDE = growth, STABILITY = stability, FLEXIBILITY = flexibility,
    ///   LEARNING_VALUE = learning, EFFORT = 6 - emotional stress
    /// - risk sensitivity = (6 - risk tolerance) × 0.2
    /// - emotional sensitivity = emotional stress × 0.2
    pub fn from_context(context: &DecisionContext) -> Self {
        let stress = context.emotional_stress.as_f64();
        Self {
            preferences: vec![
                ContextPreference::new(
                    AttributeDimension::Upside,
                    context.growth_priority.as_f64(),
                ),
                ContextPreference::new(
                    AttributeDimension::Stability,
                    context.stability_priority.as_f64(),
                ),
                ContextPreference::new(
                    AttributeDimension::Flexibility,
                    context.flexibility_priority.as_f64(),
                ),
                ContextPreference::new(
                    AttributeDimension::LearningValue,
                    context.learning_priority.as_f64(),
                ),
                ContextPreference::new(AttributeDimension::Effort, 6.0 - stress),
            ],
            risk_sensitivity: (6.0 - context.risk_tolerance.as_f64()) * 0.2,
            emotional_sensitivity: stress * 0.2,
        }
    }
}

/// Pure scoring functions.
pub struct ScoringEngine;

impl ScoringEngine {
    /// Scores a single option.
    ///
    /// # Algorithm
    /// score = Σ(weight × value[dimension])
    ///         − risk_level × risk_sensitivity
    ///         − value[EMOTIONAL_COST] × emotional_sensitivity
    ///
    /// # Edge Cases
    /// - Missing dimension value: contributes 0
    /// - No preferences: only the penalties remain
    pub fn score(
        option: &DecisionOption,
        preferences: &[ContextPreference],
        risk_sensitivity: f64,
        emotional_sensitivity: f64,
    ) -> f64 {
        let base: f64 = preferences
            .iter()
            .map(|pref| pref.weight * option.dimension(pref.dimension).unwrap_or(0.0))
            .sum();

        let risk_penalty = option.risk_level() * risk_sensitivity;
        let emotional_penalty = option
            .dimension(AttributeDimension::EmotionalCost)
            .unwrap_or(0.0)
            * emotional_sensitivity;

        base - risk_penalty - emotional_penalty
    }

    /// Scores every option and returns scored copies, best first.
    ///
    /// The sort is stable: options with equal scores keep their input order.
    /// Inputs are never mutated.
    pub fn rank(
        options: &[DecisionOption],
        preferences: &[ContextPreference],
        risk_sensitivity: f64,
        emotional_sensitivity: f64,
    ) -> Vec<DecisionOption> {
        let mut ranked: Vec<DecisionOption> = options
            .iter()
            .map(|option| {
                option.with_score(Self::score(
                    option,
                    preferences,
                    risk_sensitivity,
                    emotional_sensitivity,
                ))
            })
            .collect();

        ranked.sort_by(|a, b| {
            let a = a.computed_score().unwrap_or(f64::NEG_INFINITY);
            let b = b.computed_score().unwrap_or(f64::NEG_INFINITY);
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        });

        ranked
    }

    /// Ranks options for a context.
    pub fn rank_for_context(
        options: &[DecisionOption],
        context: &DecisionContext,
    ) -> Vec<DecisionOption> {
        let profile = ScoringProfile::from_context(context);
        Self::rank(
            options,
            &profile.preferences,
            profile.risk_sensitivity,
            profile.emotional_sensitivity,
        )
    }
}
