//! Errors surfaced by the store API client.

use std::time::Duration;

use oakline_core::forms::FormError;
use thiserror::Error;

use crate::session::SessionError;

/// Errors that can occur when talking to the store API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Missing, expired, or rejected bearer token (401 or 403).
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Input was rejected before any request was sent.
    #[error("Invalid input: {0}")]
    Form(#[from] FormError),
}

impl ApiError {
    /// HTTP status code, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Server-requested wait before the next attempt.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited(secs) => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }

    /// Whether an idempotent request that failed this way may be repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            Self::RateLimited(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short operator-facing message, e.g. `"Failed to load categories"`.
    ///
    /// Server-provided detail is appended for client errors the operator can
    /// act on (validation failures, conflicts).
    #[must_use]
    pub fn user_message(&self, action: &str) -> String {
        match self {
            Self::Api { status, message } if (400..500).contains(status) && !message.is_empty() => {
                format!("Failed to {action}: {message}")
            }
            Self::Form(err) => format!("Failed to {action}: {err}"),
            Self::Unauthorized { .. } => format!("Failed to {action}: please sign in again"),
            _ => format!("Failed to {action}"),
        }
    }
}
