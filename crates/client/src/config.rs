//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `OAKLINE_API_BASE_URL` - Base URL of the store API (e.g. `http://localhost:5000/api`)
//!
//! ## Optional
//! - `OAKLINE_API_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `OAKLINE_API_MAX_RETRIES` - Retries for idempotent reads (default: 2, `0` disables)
//! - `OAKLINE_SESSION_FILE` - Where the admin session is persisted
//!   (default: `$HOME/.oakline/session.json`)
//! - `OAKLINE_SEARCH_DEBOUNCE_MS` - Quiet period before a search fires (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::retry::RetryPolicy;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const SESSION_DIR: &str = ".oakline";
const SESSION_FILE: &str = "session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Store API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for GET requests.
    pub retry: RetryPolicy,
    /// Location of the persisted admin session.
    pub session_file: PathBuf,
    /// Quiet period used by interactive search.
    pub search_debounce: Duration,
    /// Sentry DSN for error tracking (optional).
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (optional).
    pub sentry_environment: Option<String>,
}

impl ClientConfig {
    /// Build a configuration with defaults for everything but the base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::with_max_retries(DEFAULT_MAX_RETRIES),
            session_file: default_session_file(std::env::var_os("HOME").map(PathBuf::from)),
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is missing or any variable fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("OAKLINE_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OAKLINE_API_BASE_URL".to_string()))?;
        let base_url = Url::parse(raw_url.trim()).map_err(|e| {
            ConfigError::InvalidEnvVar("OAKLINE_API_BASE_URL".to_string(), e.to_string())
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "OAKLINE_API_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let timeout_secs: u64 =
            parse_or_default(&lookup, "OAKLINE_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "OAKLINE_API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let max_retries: u32 =
            parse_or_default(&lookup, "OAKLINE_API_MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
        let debounce_ms: u64 =
            parse_or_default(&lookup, "OAKLINE_SEARCH_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;

        let session_file = lookup("OAKLINE_SESSION_FILE")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(
                || default_session_file(lookup("HOME").map(PathBuf::from)),
                PathBuf::from,
            );

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy::with_max_retries(max_retries),
            session_file,
            search_debounce: Duration::from_millis(debounce_ms),
            sentry_dsn: lookup("SENTRY_DSN").filter(|value| !value.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|value| !value.is_empty()),
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        _ => Ok(default),
    }
}

fn default_session_file(home: Option<PathBuf>) -> PathBuf {
    home.unwrap_or_default().join(SESSION_DIR).join(SESSION_FILE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_base_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "OAKLINE_API_BASE_URL"));
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("OAKLINE_API_BASE_URL", "http://localhost:5000/api"),
            ("HOME", "/home/admin"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert_eq!(
            config.session_file,
            PathBuf::from("/home/admin/.oakline/session.json")
        );
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("OAKLINE_API_BASE_URL", "https://api.example.com"),
            ("OAKLINE_API_TIMEOUT_SECS", "5"),
            ("OAKLINE_API_MAX_RETRIES", "0"),
            ("OAKLINE_SEARCH_DEBOUNCE_MS", "150"),
            ("OAKLINE_SESSION_FILE", "/tmp/oak.json"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ]))
        .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.search_debounce, Duration::from_millis(150));
        assert_eq!(config.session_file, PathBuf::from("/tmp/oak.json"));
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_invalid_values() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            ("OAKLINE_API_BASE_URL", "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));

        let err = ClientConfig::from_lookup(lookup_from(&[
            ("OAKLINE_API_BASE_URL", "http://localhost"),
            ("OAKLINE_API_MAX_RETRIES", "many"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "OAKLINE_API_MAX_RETRIES")
        );

        let err = ClientConfig::from_lookup(lookup_from(&[
            ("OAKLINE_API_BASE_URL", "http://localhost"),
            ("OAKLINE_API_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }
}
