//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid backend URL format")]
    InvalidBaseUrl,

    #[error("Evaluate path must start with '/'")]
    InvalidEvaluatePath,

    #[error("Invalid connect timeout")]
    InvalidTimeout,

    #[error("Confidence factor '{0}' must be a number between 0 and 1")]
    InvalidConfidenceFactor(&'static str),
}
