//! Integration test support for the Oakline client.
//!
//! [`MockApi`] is an axum server bound to an ephemeral local port that plays
//! the store API: tests register canned responses per method and path, run
//! client code against it, then inspect what was actually sent.
//!
//! ```rust,ignore
//! let api = MockApi::start().await;
//! api.respond(Method::GET, "/category/get-all", 200, json!([]));
//!
//! let client = ApiClient::new(&api.config()).unwrap();
//! client.categories().list(Pagination::default()).await.unwrap();
//!
//! assert_eq!(api.hits(Method::GET, "/category/get-all"), 1);
//! ```

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
pub use axum::http::Method;
use oakline_client::{ClientConfig, RetryPolicy};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// Path prefix the mock API is mounted under.
pub const API_PREFIX: &str = "/api";

/// One request as the mock server received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path without [`API_PREFIX`].
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body decoded as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
struct CannedResponse {
    status: StatusCode,
    body: Value,
}

#[derive(Default)]
struct MockState {
    /// Responses are served in order; the last one repeats.
    routes: Mutex<HashMap<(Method, String), VecDeque<CannedResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the store API.
pub struct MockApi {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockApi {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read mock API address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL to hand to the client, including [`API_PREFIX`].
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}{API_PREFIX}", self.addr)).expect("Invalid mock API URL")
    }

    /// Client configuration pointing at this server, with fast retries.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.base_url());
        config.timeout = Duration::from_secs(5);
        config.retry = RetryPolicy::with_max_retries(2)
            .with_delays(Duration::from_millis(5), Duration::from_millis(20));
        config
    }

    /// Queue a response for `method path`. Queued responses are served in
    /// order and the last one keeps being served.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) {
        let status = StatusCode::from_u16(status).expect("Invalid status code");
        self.state
            .routes
            .lock()
            .expect("mock routes lock poisoned")
            .entry((method, path.to_string()))
            .or_default()
            .push_back(CannedResponse { status, body });
    }

    /// Every request received so far, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the state lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("mock requests lock poisoned")
            .clone()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == *method && r.path == path)
            .collect()
    }

    #[must_use]
    pub fn hits(&self, method: Method, path: &str) -> usize {
        self.requests_to(&method, path).len()
    }

    /// The most recent request for `method path`.
    ///
    /// # Panics
    ///
    /// Panics if no such request was received.
    #[must_use]
    pub fn last_request(&self, method: Method, path: &str) -> RecordedRequest {
        self.requests_to(&method, path)
            .pop()
            .unwrap_or_else(|| panic!("no {method} {path} request received"))
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_string();
    let header = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state
        .requests
        .lock()
        .expect("mock requests lock poisoned")
        .push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            authorization: header(AUTHORIZATION),
            content_type: header(CONTENT_TYPE),
            body: body.to_vec(),
        });

    let canned = {
        let mut routes = state.routes.lock().expect("mock routes lock poisoned");
        routes.get_mut(&(method.clone(), path.clone())).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    match canned {
        Some(CannedResponse { status, body }) if body.is_null() => status.into_response(),
        Some(CannedResponse { status, body }) => (status, axum::Json(body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "message": format!("No mock for {method} {path}") })),
        )
            .into_response(),
    }
}

/// A category as the API returns it.
#[must_use]
pub fn category_json(id: i32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} collection"),
        "createdAt": "2026-01-10T09:00:00Z",
        "updatedAt": "2026-01-10T09:00:00Z",
    })
}

/// A product as the API returns it.
#[must_use]
pub fn product_json(id: i32, name: &str, price: &str, quantity: i32) -> Value {
    json!({
        "id": id,
        "categoryId": 1,
        "name": name,
        "description": "Solid wood",
        "price": price,
        "quantity": quantity,
        "colors": ["#8B5A2B"],
        "images": [{"public_id": format!("p{id}"), "secure_url": format!("https://img.test/p{id}.jpg")}],
        "createdAt": "2026-02-01T12:00:00Z",
    })
}

/// An order as the API returns it.
#[must_use]
pub fn order_json(id: i32, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "userId": 7,
        "totalAmount": 499.0,
        "customerName": "Ada Lovelace",
        "customerEmail": "ada@example.com",
        "status": status,
        "createdAt": created_at,
    })
}

/// An admin profile as the API returns it.
#[must_use]
pub fn admin_json(email: &str) -> Value {
    json!({
        "id": 1,
        "email": email,
        "createdAt": "2025-12-01T08:00:00Z",
    })
}
