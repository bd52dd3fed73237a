//! DecisionSession - The synchronized state cell behind one decision screen.
//!
//! A session owns a [`DecisionStreamReducer`] behind a mutex, at most one
//! running subscription task, and a `watch` channel that carries every new
//! snapshot. Stream events and user intents go through the same lock, so no
//! two transitions ever interleave.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::StreamExt;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::domain::decision::{ContextField, DecisionAuditState, DecisionContext, SessionPhase};
use crate::ports::{StreamRequest, StreamSource};

use super::reducer::{DecisionStreamReducer, SubmitRejection};

/// Identifier of one stream subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a submit intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Started(SubscriptionId),
    Rejected(SubmitRejection),
}

impl SubmitOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, SubmitOutcome::Started(_))
    }
}

struct ActiveSubscription {
    id: SubscriptionId,
    handle: JoinHandle<()>,
}

struct SessionCell {
    reducer: DecisionStreamReducer,
    active: Option<ActiveSubscription>,
}

struct Shared {
    cell: Mutex<SessionCell>,
    updates: watch::Sender<Arc<DecisionAuditState>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, cell: &SessionCell) {
        self.updates.send_replace(cell.reducer.snapshot());
    }

    /// Runs one transition for subscription `id`.
    ///
    /// Returns `None` if `id` is no longer the active subscription, otherwise
    /// the phase after the transition.
    fn transition<F>(&self, id: SubscriptionId, f: F) -> Option<SessionPhase>
    where
        F: FnOnce(&mut DecisionStreamReducer) -> bool,
    {
        let mut cell = self.lock();
        if cell.active.as_ref().map(|active| active.id) != Some(id) {
            debug!("Dropping transition from stale subscription");
            return None;
        }
        if f(&mut cell.reducer) {
            self.publish(&cell);
        }
        let phase = cell.reducer.phase();
        if !phase.is_streaming() {
            cell.active = None;
        }
        Some(phase)
    }
}

/// One decision evaluation session.
///
/// Dropping the session cancels its subscription.
pub struct DecisionSession {
    shared: Arc<Shared>,
    source: Arc<dyn StreamSource>,
}

impl DecisionSession {
    /// Creates a session with default confidence inputs and context.
    pub fn new(source: Arc<dyn StreamSource>) -> Self {
        Self::from_reducer(source, DecisionStreamReducer::default())
    }

    /// Creates a session around a preconfigured reducer.
    pub fn from_reducer(source: Arc<dyn StreamSource>, reducer: DecisionStreamReducer) -> Self {
        let (updates, _) = watch::channel(reducer.snapshot());
        Self {
            shared: Arc::new(Shared {
                cell: Mutex::new(SessionCell {
                    reducer,
                    active: None,
                }),
                updates,
            }),
            source,
        }
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> Arc<DecisionAuditState> {
        Arc::clone(&self.shared.updates.borrow())
    }

    /// Receiver that sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DecisionAuditState>> {
        self.shared.updates.subscribe()
    }

    pub fn context(&self) -> DecisionContext {
        self.shared.lock().reducer.context()
    }

    /// Identifier of the running subscription, if any.
    pub fn active_subscription(&self) -> Option<SubscriptionId> {
        self.shared.lock().active.as_ref().map(|active| active.id)
    }

    /// Starts evaluating a decision.
    ///
    /// Blank text and submits while streaming are rejected without any state
    /// change or network activity.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn submit(&self, decision_text: &str, constraints: Vec<String>) -> SubmitOutcome {
        let mut cell = self.shared.lock();
        self.start(&mut cell, decision_text, constraints)
    }

    /// Cancels any running subscription and submits the last decision again.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn reevaluate(&self) -> SubmitOutcome {
        let mut cell = self.shared.lock();
        let previous = cell.reducer.snapshot();
        self.cancel_locked(&mut cell);
        self.start(
            &mut cell,
            &previous.decision_text,
            previous.constraints.clone(),
        )
    }

    /// Replaces the context and re-ranks immediately.
    pub fn update_context(&self, context: DecisionContext) {
        let mut cell = self.shared.lock();
        if cell.reducer.update_context(context) {
            self.shared.publish(&cell);
        }
    }

    /// Sets one context field, clamped to [1, 5], and re-ranks immediately.
    pub fn update_field(&self, field: ContextField, value: i32) {
        let mut cell = self.shared.lock();
        if cell.reducer.update_field(field, value) {
            debug!(field = %field, value, "Context field updated");
            self.shared.publish(&cell);
        }
    }

    /// Stops the running subscription. Safe to call repeatedly.
    ///
    /// Returns true if a subscription was running.
    pub fn cancel(&self) -> bool {
        let mut cell = self.shared.lock();
        self.cancel_locked(&mut cell)
    }

    /// Cancels and returns to the initial state, keeping the context.
    pub fn reset(&self) {
        let mut cell = self.shared.lock();
        self.cancel_locked(&mut cell);
        if cell.reducer.reset() {
            self.shared.publish(&cell);
        }
    }

    fn start(
        &self,
        cell: &mut SessionCell,
        decision_text: &str,
        constraints: Vec<String>,
    ) -> SubmitOutcome {
        let request = match cell.reducer.begin(decision_text, constraints) {
            Ok(request) => request,
            Err(rejection) => return SubmitOutcome::Rejected(rejection),
        };
        self.shared.publish(cell);

        let id = SubscriptionId::new();
        let span = info_span!("subscription", subscription_id = %id);
        let handle = tokio::spawn(
            run_subscription(
                Arc::clone(&self.shared),
                Arc::clone(&self.source),
                id,
                request,
            )
            .instrument(span),
        );
        cell.active = Some(ActiveSubscription { id, handle });

        SubmitOutcome::Started(id)
    }

    fn cancel_locked(&self, cell: &mut SessionCell) -> bool {
        let Some(active) = cell.active.take() else {
            return false;
        };
        active.handle.abort();
        info!(subscription_id = %active.id, "Subscription cancelled");
        if cell.reducer.cancel() {
            self.shared.publish(cell);
        }
        true
    }
}

impl Drop for DecisionSession {
    fn drop(&mut self) {
        let mut cell = self.shared.lock();
        if let Some(active) = cell.active.take() {
            active.handle.abort();
        }
    }
}

async fn run_subscription(
    shared: Arc<Shared>,
    source: Arc<dyn StreamSource>,
    id: SubscriptionId,
    request: StreamRequest,
) {
    let mut events = match source.open(request).await {
        Ok(events) => events,
        Err(err) => {
            shared.transition(id, |reducer| reducer.fail_transport(&err));
            return;
        }
    };

    while let Some(item) = events.next().await {
        let phase = shared.transition(id, |reducer| match &item {
            Ok(raw) => reducer.apply_raw(raw),
            Err(err) => reducer.fail_transport(err),
        });
        match phase {
            Some(phase) if phase.is_streaming() => {}
            _ => return,
        }
    }

    shared.transition(id, DecisionStreamReducer::close_stream);
}
