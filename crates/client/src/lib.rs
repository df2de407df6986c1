//! Oakline store API client.
//!
//! A typed async client for the furniture store's REST API, used by the
//! admin CLI and any other Rust front end.
//!
//! # Layout
//!
//! - [`ApiClient`] wraps `reqwest`, attaches the bearer token, and normalizes
//!   response envelopes
//! - [`services`] exposes one method per endpoint, grouped by resource
//! - [`session`] persists the admin token ([`AuthSession`])
//! - [`auth`] runs login/logout and guards admin-only views
//! - [`dashboard`] loads the overview concurrently
//! - [`debounce`] coalesces interactive search input
//!
//! # Example
//!
//! ```rust,no_run
//! use oakline_client::{ApiClient, ClientConfig};
//! use oakline_core::Pagination;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let client = ApiClient::new(&config)?;
//! let page = client.categories().list(Pagination::default()).await?;
//! println!("{} categories", page.items.len());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod debounce;
mod envelope;
pub mod error;
pub mod retry;
pub mod services;
pub mod session;

pub use auth::{AdminAuth, AuthStatus, LOGIN_PATH};
pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use dashboard::{DashboardSnapshot, load_dashboard};
pub use debounce::Debouncer;
pub use error::ApiError;
pub use retry::RetryPolicy;
pub use session::{AuthSession, FileTokenStore, MemoryTokenStore, SessionError, TokenStore};
