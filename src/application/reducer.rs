//! DecisionStreamReducer - Synchronous state machine over audit snapshots.
//!
//! Every transition builds a fresh [`DecisionAuditState`] and swaps it in;
//! readers only ever hold an `Arc` to a finished snapshot. The reducer owns
//! the arrival-ordered option list and re-ranks it whenever options or the
//! context change.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::analysis::{ConfidenceCalculator, ConfidenceInputs, ScoringEngine};
use crate::domain::decision::{
    ContextField, DecisionAuditState, DecisionContext, DecisionOption, SessionPhase,
};
use crate::domain::foundation::StateMachine;
use crate::domain::stream::{AuditListKind, DecodeError, DecisionStreamEvent, EventCodec};
use crate::ports::{RawStreamEvent, StreamRequest, StreamSourceError};

/// Shown when the backend reports an `error` event.
pub const STREAM_ERROR_MESSAGE: &str = "Something went wrong while analyzing the decision.";

/// Shown when the connection fails or cannot be opened.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Decision analysis failed. Please retry.";

/// Why a submit intent was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Decision text was empty or whitespace.
    BlankDecision,
    /// A subscription is already streaming.
    AlreadyStreaming,
}

/// State machine applying decoded stream events and user intents.
#[derive(Debug, Clone)]
pub struct DecisionStreamReducer {
    state: Arc<DecisionAuditState>,
    accumulated: Vec<DecisionOption>,
    inputs: ConfidenceInputs,
}

impl Default for DecisionStreamReducer {
    fn default() -> Self {
        Self::new(ConfidenceInputs::default())
    }
}

impl DecisionStreamReducer {
    pub fn new(inputs: ConfidenceInputs) -> Self {
        Self {
            state: Arc::new(DecisionAuditState::default()),
            accumulated: Vec::new(),
            inputs,
        }
    }

    /// Starts with a non-default context.
    pub fn with_context(mut self, context: DecisionContext) -> Self {
        self.state = Arc::new(DecisionAuditState::with_context(context));
        self
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<DecisionAuditState> {
        Arc::clone(&self.state)
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn context(&self) -> DecisionContext {
        self.state.context
    }

    /// Options in arrival order, unscored.
    pub fn accumulated(&self) -> &[DecisionOption] {
        &self.accumulated
    }

    /// Clears previous results and enters `Streaming`.
    ///
    /// Returns the request to open the subscription with. Rejections leave
    /// the snapshot untouched.
    pub fn begin(
        &mut self,
        decision_text: &str,
        constraints: Vec<String>,
    ) -> Result<StreamRequest, SubmitRejection> {
        if decision_text.trim().is_empty() {
            debug!("Ignoring submit with blank decision text");
            return Err(SubmitRejection::BlankDecision);
        }
        if self.state.phase.is_streaming() {
            warn!("Ignoring submit while a subscription is streaming");
            return Err(SubmitRejection::AlreadyStreaming);
        }
        let phase = self
            .state
            .phase
            .transition_to(SessionPhase::Streaming)
            .map_err(|_| SubmitRejection::AlreadyStreaming)?;

        let context = self.state.context;
        self.accumulated.clear();
        self.replace(DecisionAuditState {
            decision_text: decision_text.to_string(),
            constraints: constraints.clone(),
            phase,
            is_loading: true,
            ..DecisionAuditState::with_context(context)
        });

        info!(constraints = constraints.len(), "Decision evaluation started");
        Ok(StreamRequest::new(decision_text, constraints).with_context(context))
    }

    /// Decodes and applies one raw event. Malformed or unknown events are
    /// dropped. Returns true if the snapshot changed.
    pub fn apply_raw(&mut self, raw: &RawStreamEvent) -> bool {
        if !self.state.phase.is_streaming() {
            debug!(event = %raw.event, "Dropping event outside of a stream");
            return false;
        }
        match EventCodec::decode(&raw.event, &raw.payload) {
            Ok(event) => self.apply(event),
            Err(DecodeError::UnknownEvent(tag)) => {
                debug!(event = %tag, "Dropping unrecognized event");
                false
            }
            Err(err) => {
                warn!(event = %raw.event, error = %err, "Dropping malformed event");
                false
            }
        }
    }

    /// Applies one decoded event. Returns true if the snapshot changed.
    pub fn apply(&mut self, event: DecisionStreamEvent) -> bool {
        if !self.state.phase.is_streaming() {
            debug!(event = event.kind(), "Dropping event outside of a stream");
            return false;
        }
        debug!(event = event.kind(), "Applying stream event");

        let mut next = (*self.state).clone();
        match event {
            DecisionStreamEvent::StatusUpdate(message) => {
                next.status_message = Some(message);
            }
            DecisionStreamEvent::OptionReceived(option) => {
                self.accumulated.push(option);
                self.refresh_derived(&mut next);
                debug!(option_count = self.accumulated.len(), "Options re-ranked");
            }
            DecisionStreamEvent::RecommendationText(text) => {
                next.recommendation = Some(text);
            }
            DecisionStreamEvent::AuditList { kind, items } => match kind {
                AuditListKind::KeyFactors => next.key_factors = items,
                AuditListKind::Assumptions => next.assumptions = items,
                AuditListKind::ReversalTriggers => next.reversal_triggers = items,
            },
            DecisionStreamEvent::AuditRecommendation(text) => {
                next.final_recommendation = Some(text);
            }
            DecisionStreamEvent::AuditConfidence(confidence) => {
                next.confidence = Some(confidence);
            }
            DecisionStreamEvent::DecisionAudit(audit) => {
                next.final_recommendation = audit.final_recommendation;
                next.confidence = audit.confidence;
                next.key_factors = audit.key_factors;
                next.assumptions = audit.assumptions;
                next.reversal_triggers = audit.reversal_triggers;
                next.status_message = None;
                next.is_loading = false;
                info!("Decision audit received");
            }
            DecisionStreamEvent::StreamError(detail) => {
                warn!(detail = %detail, "Backend reported a stream error");
                next.error = Some(STREAM_ERROR_MESSAGE.to_string());
                next.final_recommendation = Some(STREAM_ERROR_MESSAGE.to_string());
                next.status_message = None;
                next.is_loading = false;
                move_phase(&mut next, SessionPhase::Failed);
            }
            DecisionStreamEvent::StreamDone => {
                next.is_loading = false;
                move_phase(&mut next, SessionPhase::Completed);
                info!(
                    option_count = self.accumulated.len(),
                    "Decision evaluation completed"
                );
            }
        }
        self.publish(next)
    }

    /// Fails the active stream after a transport error.
    pub fn fail_transport(&mut self, error: &StreamSourceError) -> bool {
        if !self.state.phase.is_streaming() {
            return false;
        }
        warn!(error = %error, "Decision stream transport failed");
        let mut next = (*self.state).clone();
        next.error = Some(TRANSPORT_FAILURE_MESSAGE.to_string());
        next.final_recommendation = Some(TRANSPORT_FAILURE_MESSAGE.to_string());
        next.status_message = None;
        next.is_loading = false;
        move_phase(&mut next, SessionPhase::Failed);
        self.publish(next)
    }

    /// Completes a stream that ended without `done` or `error`.
    pub fn close_stream(&mut self) -> bool {
        if !self.state.phase.is_streaming() {
            return false;
        }
        debug!("Stream closed without a terminal event");
        let mut next = (*self.state).clone();
        next.is_loading = false;
        move_phase(&mut next, SessionPhase::Completed);
        self.publish(next)
    }

    /// Replaces the context and re-ranks the accumulated options.
    ///
    /// Works in every phase and never touches the network.
    pub fn update_context(&mut self, context: DecisionContext) -> bool {
        let mut next = (*self.state).clone();
        next.context = context;
        self.refresh_derived(&mut next);
        self.publish(next)
    }

    /// Sets one context field, clamped to [1, 5].
    pub fn update_field(&mut self, field: ContextField, value: i32) -> bool {
        let context = self.state.context.with_field(field, value);
        self.update_context(context)
    }

    /// Leaves `Streaming` for `Idle`, keeping everything received so far.
    pub fn cancel(&mut self) -> bool {
        if !self.state.phase.is_streaming() {
            return false;
        }
        let mut next = (*self.state).clone();
        next.is_loading = false;
        next.status_message = None;
        move_phase(&mut next, SessionPhase::Idle);
        self.publish(next)
    }

    /// Returns to the initial state, keeping the context.
    pub fn reset(&mut self) -> bool {
        self.accumulated.clear();
        let next = DecisionAuditState::with_context(self.state.context);
        self.publish(next)
    }

    fn refresh_derived(&self, next: &mut DecisionAuditState) {
        if self.accumulated.is_empty() {
            next.options = Vec::new();
            next.confidence_score = None;
            return;
        }
        let ranked = ScoringEngine::rank_for_context(&self.accumulated, &next.context);
        next.confidence_score = Some(ConfidenceCalculator::for_ranking(&self.inputs, &ranked));
        next.options = ranked;
    }

    fn publish(&mut self, next: DecisionAuditState) -> bool {
        if *self.state == next {
            return false;
        }
        self.replace(next);
        true
    }

    fn replace(&mut self, next: DecisionAuditState) {
        self.state = Arc::new(next);
    }
}

fn move_phase(state: &mut DecisionAuditState, target: SessionPhase) {
    match state.phase.transition_to(target) {
        Ok(phase) => state.phase = phase,
        Err(err) => warn!(error = %err, "Rejected phase transition"),
    }
}
