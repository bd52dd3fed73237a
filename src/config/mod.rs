//! Application configuration module
//!
//! Configuration is read from environment variables with the `DECISION_AUDIT`
//! prefix, using `config` and `dotenvy`. Nested values use double underscores.
//! Every value has a default, so an empty environment loads a working setup
//! pointed at a local backend.
//!
//! # Example
//!
//! ```no_run
//! use decision_audit::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Streaming from {}", config.stream.base_url);
//! ```

mod error;
mod logging;
mod scoring;
mod stream;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use scoring::ScoringConfig;
pub use stream::StreamConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Decision evaluation backend (URL, path, timeout, token)
    #[serde(default)]
    pub stream: StreamConfig,

    /// Fixed confidence factors
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DECISION_AUDIT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `DECISION_AUDIT__STREAM__BASE_URL=http://backend:8000` -> `stream.base_url`
    /// - `DECISION_AUDIT__LOGGING__JSON=true` -> `logging.json = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DECISION_AUDIT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.stream.validate()?;
        self.scoring.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const KEYS: [&str; 6] = [
        "DECISION_AUDIT__STREAM__BASE_URL",
        "DECISION_AUDIT__STREAM__CONNECT_TIMEOUT_SECS",
        "DECISION_AUDIT__STREAM__API_TOKEN",
        "DECISION_AUDIT__SCORING__INPUT_COMPLETENESS",
        "DECISION_AUDIT__LOGGING__FILTER",
        "DECISION_AUDIT__LOGGING__JSON",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.stream.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.stream.evaluate_path, "/decision/evaluate");
        assert!(config.stream.api_token.is_none());
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DECISION_AUDIT__STREAM__BASE_URL", "https://audit.example.com");
        env::set_var("DECISION_AUDIT__STREAM__CONNECT_TIMEOUT_SECS", "3");
        env::set_var("DECISION_AUDIT__STREAM__API_TOKEN", "token-123");
        env::set_var("DECISION_AUDIT__SCORING__INPUT_COMPLETENESS", "0.9");
        env::set_var("DECISION_AUDIT__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.stream.base_url, "https://audit.example.com");
        assert_eq!(config.stream.connect_timeout_secs, 3);
        assert_eq!(
            config.stream.api_token.as_ref().map(|t| t.expose_secret().as_str()),
            Some("token-123")
        );
        assert!((config.scoring.input_completeness - 0.9).abs() < 1e-12);
        assert!((config.scoring.constraint_clarity - 0.8).abs() < 1e-12);
        assert!(config.logging.json);
    }

    #[test]
    fn test_validate_reports_bad_section() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DECISION_AUDIT__STREAM__BASE_URL", "backend:8000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidBaseUrl));
    }

    #[test]
    fn test_validate_rejects_blank_log_filter() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DECISION_AUDIT__LOGGING__FILTER", " ");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("LOGGING__FILTER"))
        ));
    }
}
