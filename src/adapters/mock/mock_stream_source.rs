//! Mock Stream Source for testing.
//!
//! Provides a scripted implementation of the StreamSource port, so session
//! behavior can be exercised without a backend.
//!
//! # Features
//!
//! - Pre-scripted event sequences (consumed one script per `open`)
//! - Streams that stay open after their events, for cancellation tests
//! - Channel-driven streams for step-by-step tests
//! - Open failures for resilience testing
//! - Request tracking and stream release counting for verification
//!
//! # Example
//!
//! ```ignore
//! let source = MockStreamSource::new()
//!     .with_events(vec![RawStreamEvent::new("done", Value::Null)]);
//!
//! let stream = source.open(StreamRequest::new("Move?", vec![])).await?;
//! assert_eq!(source.open_count(), 1);
//! ```

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

use crate::ports::{RawEventStream, RawStreamEvent, StreamRequest, StreamSource, StreamSourceError};

type StreamItem = Result<RawStreamEvent, StreamSourceError>;

/// Sender half of a channel-driven mock stream. Dropping it ends the stream.
pub type MockStreamSender = mpsc::UnboundedSender<StreamItem>;

/// One scripted answer to `open`.
#[derive(Debug)]
pub enum MockScript {
    /// Yield these items, then end (or stay pending if `hold_open`).
    Events {
        items: Vec<StreamItem>,
        hold_open: bool,
    },
    /// Yield whatever the paired sender sends.
    Channel(mpsc::UnboundedReceiver<StreamItem>),
    /// Fail to open.
    OpenFailure(StreamSourceError),
}

/// Mock stream source for testing.
#[derive(Debug, Clone, Default)]
pub struct MockStreamSource {
    scripts: Arc<Mutex<VecDeque<MockScript>>>,
    requests: Arc<Mutex<Vec<StreamRequest>>>,
    released: Arc<AtomicUsize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockStreamSource {
    /// Creates a mock with no scripts; unscripted opens yield an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a stream that yields the events and then ends.
    pub fn with_events(self, events: Vec<RawStreamEvent>) -> Self {
        self.push(MockScript::Events {
            items: events.into_iter().map(Ok).collect(),
            hold_open: false,
        })
    }

    /// Queues a stream that yields the events and then stays open.
    pub fn with_events_held_open(self, events: Vec<RawStreamEvent>) -> Self {
        self.push(MockScript::Events {
            items: events.into_iter().map(Ok).collect(),
            hold_open: true,
        })
    }

    /// Queues a stream that yields the items (events or errors) and then ends.
    pub fn with_items(self, items: Vec<StreamItem>) -> Self {
        self.push(MockScript::Events {
            items,
            hold_open: false,
        })
    }

    /// Queues a failure to open.
    pub fn with_open_failure(self, error: StreamSourceError) -> Self {
        self.push(MockScript::OpenFailure(error))
    }

    /// Queues a channel-driven stream and returns its sender.
    pub fn with_channel(self) -> (Self, MockStreamSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        (self.push(MockScript::Channel(rx)), tx)
    }

    fn push(self, script: MockScript) -> Self {
        lock(&self.scripts).push_back(script);
        self
    }

    /// Returns the number of `open` calls made.
    pub fn open_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Returns all recorded requests.
    pub fn requests(&self) -> Vec<StreamRequest> {
        lock(&self.requests).clone()
    }

    /// Returns how many opened streams have been dropped.
    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamSource for MockStreamSource {
    async fn open(&self, request: StreamRequest) -> Result<RawEventStream, StreamSourceError> {
        lock(&self.requests).push(request);

        let script = lock(&self.scripts).pop_front();
        let inner: RawEventStream = match script {
            None => Box::pin(stream::empty()),
            Some(MockScript::OpenFailure(error)) => return Err(error),
            Some(MockScript::Events { items, hold_open }) => {
                let scripted = stream::iter(items);
                if hold_open {
                    Box::pin(scripted.chain(stream::pending()))
                } else {
                    Box::pin(scripted)
                }
            }
            Some(MockScript::Channel(rx)) => Box::pin(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            })),
        };

        Ok(Box::pin(TrackedStream {
            inner,
            released: Arc::clone(&self.released),
        }))
    }
}

/// Counts its own drop so tests can verify the subscription was released.
struct TrackedStream {
    inner: RawEventStream,
    released: Arc<AtomicUsize>,
}

impl Stream for TrackedStream {
    type Item = StreamItem;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn request() -> StreamRequest {
        StreamRequest::new("Move?", vec!["budget".to_string()])
    }

    #[tokio::test]
    async fn yields_scripted_events_in_order() {
        let source = MockStreamSource::new().with_events(vec![
            RawStreamEvent::new("status", json!({"message": "a"})),
            RawStreamEvent::new("done", Value::Null),
        ]);

        let items: Vec<_> = source.open(request()).await.unwrap().collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().event, "status");
        assert_eq!(items[1].as_ref().unwrap().event, "done");
    }

    #[tokio::test]
    async fn records_requests() {
        let source = MockStreamSource::new();
        let _stream = source.open(request()).await.unwrap();

        assert_eq!(source.open_count(), 1);
        assert_eq!(source.requests()[0].constraints, vec!["budget".to_string()]);
    }

    #[tokio::test]
    async fn open_failure_is_returned() {
        let source =
            MockStreamSource::new().with_open_failure(StreamSourceError::connection("refused"));

        let result = source.open(request()).await;
        assert!(matches!(result, Err(StreamSourceError::Connection(_))));
    }

    #[tokio::test]
    async fn held_open_stream_does_not_end() {
        let source = MockStreamSource::new()
            .with_events_held_open(vec![RawStreamEvent::new("status", json!({"message": "a"}))]);
        let mut stream = source.open(request()).await.unwrap();

        assert!(stream.next().await.is_some());
        let next = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
        assert!(next.is_err(), "held-open stream should still be pending");
    }

    #[tokio::test]
    async fn channel_stream_ends_when_sender_dropped() {
        let (source, tx) = MockStreamSource::new().with_channel();
        let mut stream = source.open(request()).await.unwrap();

        tx.send(Ok(RawStreamEvent::new("done", Value::Null))).unwrap();
        drop(tx);

        assert_eq!(stream.next().await.unwrap().unwrap().event, "done");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn dropping_stream_counts_release() {
        let source = MockStreamSource::new();
        let stream = source.open(request()).await.unwrap();
        assert_eq!(source.released_count(), 0);

        drop(stream);
        assert_eq!(source.released_count(), 1);
    }
}
