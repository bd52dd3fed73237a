//! Stream Source Port - Interface for the backend decision event stream.
//!
//! The core asks for one subscription per evaluation and consumes raw
//! `(event, payload)` pairs until the stream ends or fails. Transport details
//! (headers, framing, reconnection) stay inside the adapter.
//!
//! # Example
//!
//! ```ignore
//! let mut events = source.open(StreamRequest::new("Should I move?", vec![])).await?;
//! while let Some(item) = events.next().await {
//!     let raw = item?;
//!     println!("{} -> {}", raw.event, raw.payload);
//! }
//! ```

use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;
use serde_json::Value;
use std::pin::Pin;

use crate::domain::decision::DecisionContext;

/// Stream of raw events produced by a [`StreamSource`].
///
/// Dropping the stream closes the subscription and releases the connection.
pub type RawEventStream =
    Pin<Box<dyn Stream<Item = Result<RawStreamEvent, StreamSourceError>> + Send>>;

/// Port for opening decision evaluation streams.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Opens one subscription for the given request.
    async fn open(&self, request: StreamRequest) -> Result<RawEventStream, StreamSourceError>;
}

/// What the backend is asked to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamRequest {
    pub decision_text: String,
    pub constraints: Vec<String>,
    pub context: DecisionContext,
}

impl StreamRequest {
    /// Creates a request with the default context.
    pub fn new(decision_text: impl Into<String>, constraints: Vec<String>) -> Self {
        Self {
            decision_text: decision_text.into(),
            constraints,
            context: DecisionContext::default(),
        }
    }

    /// Sets the context sent along with the request.
    pub fn with_context(mut self, context: DecisionContext) -> Self {
        self.context = context;
        self
    }
}

/// One undecoded event.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStreamEvent {
    /// Event tag (`status`, `option`, ...).
    pub event: String,
    /// Parsed payload; `null` when the event carried no data.
    pub payload: Value,
}

impl RawStreamEvent {
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }
}

/// Transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamSourceError {
    /// The connection could not be established.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The backend answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Connecting took longer than the configured timeout.
    #[error("connection timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The stream broke after it was opened.
    #[error("stream error: {0}")]
    Stream(String),
}

impl StreamSourceError {
    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates a mid-stream error.
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::ContextField;

    #[test]
    fn request_serializes_backend_shape() {
        let request = StreamRequest::new("Move to Berlin?", vec!["budget".to_string()])
            .with_context(DecisionContext::default().with_field(ContextField::RiskTolerance, 1));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["decision_text"], "Move to Berlin?");
        assert_eq!(json["constraints"][0], "budget");
        assert_eq!(json["context"]["risk_tolerance"], 1);
    }

    #[test]
    fn error_messages_are_readable() {
        let err = StreamSourceError::Status {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected status 503: down");
        assert_eq!(
            StreamSourceError::Timeout { timeout_secs: 10 }.to_string(),
            "connection timed out after 10s"
        );
    }
}
