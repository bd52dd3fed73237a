//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and the outside world. Adapters implement these ports.
//!
//! - `StreamSource` - Opens the backend decision event stream

mod stream_source;

pub use stream_source::{
    RawEventStream, RawStreamEvent, StreamRequest, StreamSource, StreamSourceError,
};
