//! CLI error type.

use oakline_client::{ApiError, ConfigError, SessionError};
use oakline_core::forms::FormError;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An API call failed; `message` is the operator-facing summary.
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Not signed in; run `oak login` first (login page: {0})")]
    LoginRequired(&'static str),

    #[error("Invalid input: {0}")]
    Form(#[from] FormError),

    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Attach an operator-facing action to an API result.
pub trait RequestExt<T> {
    /// `action` completes "Failed to ...", e.g. `"load categories"`.
    ///
    /// # Errors
    ///
    /// Wraps the `ApiError` in [`CliError::Request`].
    fn for_action(self, action: &str) -> Result<T, CliError>;
}

impl<T> RequestExt<T> for Result<T, ApiError> {
    fn for_action(self, action: &str) -> Result<T, CliError> {
        self.map_err(|source| match source {
            ApiError::Form(err) => CliError::Form(err),
            source => CliError::Request {
                message: source.user_message(action),
                source,
            },
        })
    }
}
