//! HTTP wrapper shared by every resource service.
//!
//! Builds `{base_url}/{resource}/{action}[/{id}][?query]` URLs, attaches the
//! bearer token when one is held, and turns non-2xx answers into
//! [`ApiError`]. Failures are logged once here and returned unchanged.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::retry::RetryPolicy;
use crate::session::AuthSession;

const JSON_CONTENT_TYPE: &str = "application/json";
const USER_AGENT: &str = concat!("oakline-client/", env!("CARGO_PKG_VERSION"));
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Query string pairs appended to an endpoint.
pub(crate) type Query<'a> = [(&'a str, String)];

/// Store API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the token slot.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create an anonymous client (no bearer token).
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::build(config, None)
    }

    /// Create a client that authenticates with an explicit token.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_token(config: &ClientConfig, token: SecretString) -> Result<Self, ApiError> {
        Self::build(config, Some(token))
    }

    /// Create a client that picks up whatever token the session holds now.
    ///
    /// Later logins and logouts must be mirrored with [`ApiClient::set_token`]
    /// and [`ApiClient::clear_token`]; the auth guard does this.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be read or the HTTP client fails
    /// to build.
    pub fn with_session(config: &ClientConfig, session: &AuthSession) -> Result<Self, ApiError> {
        let token = session.token()?;
        Self::build(config, token)
    }

    fn build(config: &ClientConfig, token: Option<SecretString>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                retry: config.retry,
                token: RwLock::new(token),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Replace the bearer token used for subsequent requests.
    pub async fn set_token(&self, token: SecretString) {
        *self.inner.token.write().await = Some(token);
    }

    /// Drop the bearer token; subsequent requests are anonymous.
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    pub async fn has_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    /// Resolve an endpoint path against the base URL.
    pub(crate) fn endpoint(&self, path: &str, query: &Query<'_>) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{}", path.trim_start_matches('/')))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        Ok(url)
    }

    /// Execute a GET request, retrying transient failures per the policy.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        let mut attempt = 0;
        loop {
            let request = self.json_request(Method::GET, &url);
            match self.execute(&Method::GET, &url, request).await {
                Err(err) if attempt < self.inner.retry.max_retries && err.is_retryable() => {
                    let delay = self.inner.retry.backoff(attempt, err.retry_after());
                    attempt += 1;
                    warn!(
                        url = %url,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "Retrying GET request"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(path, &[])?;
        let request = self.json_request(Method::POST, &url).json(body);
        self.execute(&Method::POST, &url, request).await
    }

    /// Execute a PATCH request with a JSON body.
    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(path, &[])?;
        let request = self.json_request(Method::PATCH, &url).json(body);
        self.execute(&Method::PATCH, &url, request).await
    }

    /// Execute a DELETE request whose body is decoded.
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query<'_>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        let request = self.json_request(Method::DELETE, &url);
        self.execute(&Method::DELETE, &url, request).await
    }

    /// Execute a POST with a multipart body.
    ///
    /// No `Content-Type` is set here so reqwest can emit the boundary header.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, &[])?;
        let request = self.inner.http.post(url.clone()).multipart(form);
        self.execute(&Method::POST, &url, request).await
    }

    fn json_request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.inner
            .http
            .request(method, url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let request = self.authorize(request).await;
        debug!(method = %method, url = %url, "Sending API request");

        let result = match request.send().await {
            Ok(response) => Self::handle_response(response).await,
            Err(err) => Err(ApiError::from(err)),
        };
        if let Err(err) = &result {
            error!(method = %method, url = %url, error = %err, "API request failed");
        }
        result
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.inner.token.read().await;
        match token.as_ref() {
            Some(token) => {
                request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            }
            None => request,
        }
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::parse_error(response).await);
        }

        let body = response.text().await?;
        // 204 and empty 200s decode as JSON null so `Option<_>` targets work.
        let body = if body.trim().is_empty() { "null" } else { &body };
        serde_json::from_str(body)
            .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")))
    }

    /// Parse error response from the API.
    async fn parse_error(response: Response) -> ApiError {
        let status = response.status();

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok());

        let raw = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = error_message(&raw);

        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                ApiError::RateLimited(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ => ApiError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Pull `message` or `error` out of a JSON error body, else keep the raw text.
fn error_message(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| raw.trim().to_string())
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("retry", &self.inner.retry)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
