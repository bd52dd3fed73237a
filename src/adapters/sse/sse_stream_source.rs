//! SSE Stream Source - Implementation of StreamSource over HTTP.
//!
//! # Configuration
//!
//! ```ignore
//! let config = SseSourceConfig::new("http://127.0.0.1:8000")
//!     .with_evaluate_path("/decision/evaluate")
//!     .with_connect_timeout(Duration::from_secs(5));
//!
//! let source = SseStreamSource::new(config)?;
//! ```
//!
//! # Streaming
//!
//! The evaluation request is POSTed as JSON and the response body is read as
//! `text/event-stream`. Only connecting is bounded by a timeout; the stream
//! itself stays open for as long as the backend keeps talking.

use async_trait::async_trait;
use futures::future;
use futures::stream::{self, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::debug;

use crate::config::StreamConfig;
use crate::ports::{RawEventStream, StreamRequest, StreamSource, StreamSourceError};

use super::frame_decoder::SseFrameDecoder;

/// Configuration for the SSE stream source.
#[derive(Debug, Clone)]
pub struct SseSourceConfig {
    /// Backend base URL (e.g., "http://127.0.0.1:8000").
    pub base_url: String,
    /// Path of the evaluation endpoint.
    pub evaluate_path: String,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
    /// Optional bearer token.
    api_token: Option<Secret<String>>,
}

impl SseSourceConfig {
    /// Creates a configuration for the given backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            evaluate_path: "/decision/evaluate".to_string(),
            connect_timeout: Duration::from_secs(10),
            api_token: None,
        }
    }

    /// Builds the adapter configuration from application configuration.
    pub fn from_stream_config(config: &StreamConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            evaluate_path: config.evaluate_path.clone(),
            connect_timeout: config.connect_timeout(),
            api_token: config.api_token.clone(),
        }
    }

    /// Sets the evaluation endpoint path.
    pub fn with_evaluate_path(mut self, path: impl Into<String>) -> Self {
        self.evaluate_path = path.into();
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the bearer token sent with every request.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Secret::new(token.into()));
        self
    }

    /// Returns the full evaluation URL.
    pub fn evaluate_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.evaluate_path
        )
    }
}

/// Decision stream source backed by an HTTP event stream.
pub struct SseStreamSource {
    config: SseSourceConfig,
    client: Client,
}

impl SseStreamSource {
    /// Creates a new source with the given configuration.
    pub fn new(config: SseSourceConfig) -> Result<Self, StreamSourceError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| StreamSourceError::connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn map_send_error(&self, err: reqwest::Error) -> StreamSourceError {
        if err.is_timeout() {
            StreamSourceError::Timeout {
                timeout_secs: self.config.connect_timeout.as_secs(),
            }
        } else if err.is_connect() {
            StreamSourceError::connection(format!("Connection failed: {}", err))
        } else {
            StreamSourceError::connection(err.to_string())
        }
    }
}

#[async_trait]
impl StreamSource for SseStreamSource {
    async fn open(&self, request: StreamRequest) -> Result<RawEventStream, StreamSourceError> {
        let url = self.config.evaluate_url();
        debug!(%url, constraints = request.constraints.len(), "Opening decision stream");

        let mut builder = self
            .client
            .post(&url)
            .header(ACCEPT, "text/event-stream")
            .json(&request);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamSourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // `None` marks the end of the body.
        let events = response
            .bytes_stream()
            .map(Some)
            .chain(stream::once(future::ready(None)))
            .scan(SseFrameDecoder::new(), |decoder, chunk| {
                let items: Vec<_> = match chunk {
                    Some(Ok(bytes)) => decoder.push(&bytes).into_iter().map(Ok).collect(),
                    Some(Err(e)) => vec![Err(StreamSourceError::stream(e.to_string()))],
                    None => {
                        if decoder.has_pending() {
                            debug!("Discarding incomplete trailing frame");
                        }
                        Vec::new()
                    }
                };
                future::ready(Some(items))
            })
            .flat_map(stream::iter);

        Ok(Box::pin(events))
    }
}
