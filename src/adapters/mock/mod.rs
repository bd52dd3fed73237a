//! Mock adapter - scripted `StreamSource` for tests and demos.

mod mock_stream_source;

pub use mock_stream_source::{MockScript, MockStreamSender, MockStreamSource};
