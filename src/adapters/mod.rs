//! Adapters - Implementations of port interfaces.
//!
//! - `sse` - HTTP event-stream source for the decision backend
//! - `mock` - Scripted source for tests

pub mod mock;
pub mod sse;

pub use mock::{MockScript, MockStreamSender, MockStreamSource};
pub use sse::{SseFrameDecoder, SseSourceConfig, SseStreamSource};
