use oakline_core::{Admin, Email, LoginResponse};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use crate::client::ApiClient;
use crate::envelope::ItemEnvelope;
use crate::error::ApiError;

/// Admin account endpoints under `/admin`.
///
/// These calls do not touch the session store; see [`crate::auth::AdminAuth`]
/// for the login flow that persists the token.
#[derive(Debug, Clone, Copy)]
pub struct AdminService<'a> {
    client: &'a ApiClient,
}

/// Login and registration body. The password is exposed only here.
#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl<'a> Credentials<'a> {
    fn new(email: &'a Email, password: &'a SecretString) -> Self {
        Self {
            email: email.as_str(),
            password: password.expose_secret(),
        }
    }
}

impl<'a> AdminService<'a> {
    pub(crate) const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        self.client
            .post("/admin/login", &Credentials::new(email, password))
            .await
    }

    /// The admin the current token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the token is missing or expired.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Admin, ApiError> {
        let response: ItemEnvelope<Admin> = self.client.get("/admin/profile", &[]).await?;
        Ok(response.into_inner())
    }

    /// Create another admin account.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &Email, password: &SecretString) -> Result<Admin, ApiError> {
        let response: ItemEnvelope<Admin> = self
            .client
            .post("/admin/register", &Credentials::new(email, password))
            .await?;
        Ok(response.into_inner())
    }
}
