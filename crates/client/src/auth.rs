//! Admin sign-in flow and route guard.
//!
//! [`AdminAuth`] keeps the persisted [`AuthSession`] and the client's
//! in-memory token in step: login writes both, logout and a failed profile
//! check clear both, so a rejected token is never sent again.

use oakline_core::{Admin, Email, LoginResponse};
use secrecy::SecretString;
use tracing::{error, info, instrument, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session::AuthSession;

/// Where unauthenticated admins are sent.
pub const LOGIN_PATH: &str = "/admin/login";

/// Outcome of guarding an admin-only view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// Token verified against `/admin/profile`.
    Authenticated(Admin),
    /// No usable token; send the operator to `redirect_to`.
    LoginRequired { redirect_to: &'static str },
}

impl AuthStatus {
    const fn login_required() -> Self {
        Self::LoginRequired {
            redirect_to: LOGIN_PATH,
        }
    }

    #[must_use]
    pub const fn admin(&self) -> Option<&Admin> {
        match self {
            Self::Authenticated(admin) => Some(admin),
            Self::LoginRequired { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Login, logout and route guarding for the admin area.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    client: ApiClient,
    session: AuthSession,
}

impl AdminAuth {
    #[must_use]
    pub const fn new(client: ApiClient, session: AuthSession) -> Self {
        Self { client, session }
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub const fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Sign in and persist the issued token with the admin's email.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials, or
    /// `ApiError::Session` if the token could not be persisted.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let response = self.client.admin().login(email, password).await?;
        let token = SecretString::from(response.token.clone());

        self.session.set_token(&token, Some(email.as_str()))?;
        self.client.set_token(token).await;

        info!("Admin signed in");
        Ok(response)
    }

    /// Forget the token locally. There is no server-side logout endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` if the stored token could not be removed.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.clear_token().await;
        self.session.clear()?;
        info!("Admin signed out");
        Ok(())
    }

    /// Guard an admin-only view.
    ///
    /// With no stored token this returns [`AuthStatus::LoginRequired`]
    /// without contacting the API. Otherwise the token is checked against
    /// `/admin/profile`; any failure clears the stored and in-memory token.
    #[instrument(skip(self))]
    pub async fn require_admin(&self) -> AuthStatus {
        let token = match self.session.token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                self.client.clear_token().await;
                return AuthStatus::login_required();
            }
            Err(err) => {
                warn!(error = %err, "Could not read admin session");
                self.forget().await;
                return AuthStatus::login_required();
            }
        };

        self.client.set_token(token).await;
        match self.client.admin().profile().await {
            Ok(admin) => AuthStatus::Authenticated(admin),
            Err(err) => {
                warn!(error = %err, "Admin token rejected, clearing session");
                self.forget().await;
                AuthStatus::login_required()
            }
        }
    }

    async fn forget(&self) {
        self.client.clear_token().await;
        if let Err(err) = self.session.clear() {
            error!(error = %err, "Failed to clear admin session");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::config::ClientConfig;
    use crate::retry::RetryPolicy;

    /// A base URL nothing listens on; any request fails fast.
    fn unreachable_config() -> ClientConfig {
        let mut config = ClientConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        config.retry = RetryPolicy::none();
        config
    }

    #[tokio::test]
    async fn test_no_token_requires_login() {
        let session = AuthSession::in_memory();
        let client = ApiClient::with_session(&unreachable_config(), &session).unwrap();
        let auth = AdminAuth::new(client, session);

        let status = auth.require_admin().await;
        assert_eq!(
            status,
            AuthStatus::LoginRequired {
                redirect_to: "/admin/login"
            }
        );
        assert!(!auth.client().has_token().await);
    }

    #[tokio::test]
    async fn test_failed_profile_clears_session() {
        let session = AuthSession::in_memory();
        session
            .set_token(&SecretString::from("stale"), Some("admin@oakline.test"))
            .unwrap();
        let client = ApiClient::with_session(&unreachable_config(), &session).unwrap();
        let auth = AdminAuth::new(client, session.clone());

        let status = auth.require_admin().await;
        assert!(!status.is_authenticated());
        assert!(session.token().unwrap().is_none());
        assert!(!auth.client().has_token().await);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let session = AuthSession::in_memory();
        session.set_token(&SecretString::from("t"), None).unwrap();
        let client = ApiClient::with_session(&unreachable_config(), &session).unwrap();
        let auth = AdminAuth::new(client, session.clone());

        auth.logout().await.unwrap();
        assert!(session.token().unwrap().is_none());
        assert!(!auth.client().has_token().await);
    }
}
