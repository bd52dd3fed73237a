//! Incremental `text/event-stream` framing.
//!
//! ```text
//! event: option
//! data: {"title":"Stay"}
//!
//! ```
//!
//! Network chunks can split a frame (or a UTF-8 sequence) anywhere, so the
//! decoder buffers raw bytes and only interprets complete lines.

use serde_json::Value;

use crate::ports::RawStreamEvent;

/// Tag used when a frame has data but no `event:` line.
pub const DEFAULT_EVENT_NAME: &str = "message";

/// Stateful decoder turning byte chunks into raw events.
#[derive(Debug, Default)]
pub struct SseFrameDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseFrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<RawStreamEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            let line = line.strip_suffix('\r').unwrap_or(&line);

            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }
        events
    }

    /// Returns true if a frame has started but not been dispatched.
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty() || self.event.is_some() || !self.data.is_empty()
    }

    fn process_line(&mut self, line: &str) -> Option<RawStreamEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // `id` and `retry` only matter for reconnection, which the core never does.
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<RawStreamEvent> {
        let event = self.event.take();
        if event.is_none() && self.data.is_empty() {
            return None;
        }

        let data = std::mem::take(&mut self.data).join("\n");
        let payload = if data.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&data).unwrap_or(Value::String(data))
        };

        Some(RawStreamEvent::new(
            event.unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string()),
            payload,
        ))
    }
}
