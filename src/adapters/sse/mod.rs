//! SSE adapter - the HTTP `text/event-stream` implementation of `StreamSource`.

mod frame_decoder;
mod sse_stream_source;

pub use frame_decoder::{SseFrameDecoder, DEFAULT_EVENT_NAME};
pub use sse_stream_source::{SseSourceConfig, SseStreamSource};
