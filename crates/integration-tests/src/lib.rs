//! Integration tests for GreenCart.
//!
//! Every test starts a [`FakeBackend`]: an axum server on an ephemeral port
//! that records each request and answers from a per-route script. Nothing
//! outside the process is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p greencart-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use greencart_integration_tests::{FakeBackend, customer_session};
//! use serde_json::json;
//!
//! # async fn example() {
//! let backend = FakeBackend::start().await;
//! backend.respond("GET", "cart/5/", 200, json!({"cart_items": []}));
//! let api = backend.api(customer_session(5));
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use greencart_client::types::User;
use greencart_client::{ApiClient, ClientConfig, Session};
use greencart_core::{Role, UserId};
use secrecy::SecretString;
use serde_json::{Value, json};

/// Path prefix the fake backend mounts the API under.
pub const API_PREFIX: &str = "/api/";

/// A request the fake backend received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path relative to [`API_PREFIX`], e.g. `cart/5/`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub content_type: Option<String>,
    /// JSON body, or `Value::Null` for empty and non-JSON bodies.
    pub body: Value,
    pub raw_body: Bytes,
}

/// A scripted answer.
#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: Value,
    delay: Option<Duration>,
}

#[derive(Default)]
struct Shared {
    requests: Vec<RecordedRequest>,
    /// Replies per `(method, path)`. The last reply repeats once the queue
    /// is down to one.
    script: HashMap<(String, String), VecDeque<Reply>>,
}

/// In-process stand-in for the GreenCart backend.
#[derive(Clone)]
pub struct FakeBackend {
    addr: SocketAddr,
    shared: Arc<Mutex<Shared>>,
}

impl FakeBackend {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("failed to bind fake backend: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("fake backend has no address: {e}"));

        let app = Router::new().fallback(handle).with_state(Arc::clone(&shared));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, shared }
    }

    /// Base URL clients should use.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}{API_PREFIX}", self.addr)
    }

    /// An API client for `session` pointed at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn api(&self, session: Session) -> ApiClient {
        let config = ClientConfig::with_base_url(&self.base_url())
            .unwrap_or_else(|e| panic!("invalid fake backend URL: {e}"));
        ApiClient::new(&config, session).unwrap_or_else(|e| panic!("client build failed: {e}"))
    }

    /// Answer `method path` with `status` and `body` from now on.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.script(method, path, [Reply {
            status,
            body,
            delay: None,
        }]);
    }

    /// Answer successive `method path` requests with `bodies` (all 200),
    /// repeating the last.
    pub fn respond_in_turn(&self, method: &str, path: &str, bodies: Vec<Value>) {
        self.script(
            method,
            path,
            bodies.into_iter().map(|body| Reply {
                status: 200,
                body,
                delay: None,
            }),
        );
    }

    /// Answer `method path` with 200 and `body`, but only after `delay`.
    pub fn respond_slowly(&self, method: &str, path: &str, delay: Duration, body: Value) {
        self.script(method, path, [Reply {
            status: 200,
            body,
            delay: Some(delay),
        }]);
    }

    fn script(&self, method: &str, path: &str, replies: impl IntoIterator<Item = Reply>) {
        let mut shared = self.lock();
        shared
            .script
            .insert((method.to_string(), path.to_string()), replies.into_iter().collect());
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests to one path, in arrival order.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn handle(
    State(shared): State<Arc<Mutex<Shared>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_string();

    let request = RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: header("authorization"),
        request_id: header("x-request-id"),
        content_type: header("content-type"),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        raw_body: body,
    };

    let reply = {
        let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.requests.push(request);
        shared
            .script
            .get_mut(&(method.to_string(), path))
            .and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
    };

    let Some(reply) = reply else {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(json!({"error": "Not found"})),
        )
            .into_response();
    };
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, axum::Json(reply.body)).into_response()
}

/// A session signed in as `user_id` with `role`.
///
/// # Panics
///
/// Panics if the in-memory session rejects the sign-in.
#[must_use]
pub fn session_as(user_id: i64, role: Role) -> Session {
    let session = Session::in_memory();
    let user = User {
        user_id: UserId::new(user_id),
        username: format!("user{user_id}"),
        email: format!("user{user_id}@example.com"),
        role,
        ..User::default()
    };
    session
        .sign_in(SecretString::from(format!("token-{user_id}")), user)
        .unwrap_or_else(|e| panic!("sign in failed: {e}"));
    session
}

/// A signed-in customer session.
#[must_use]
pub fn customer_session(user_id: i64) -> Session {
    session_as(user_id, Role::Customer)
}

/// A cart line as the backend sends it.
#[must_use]
pub fn cart_line(cart_id: i64, plant_id: i64, size: &str, quantity: u32, price: &str) -> Value {
    json!({
        "cart_id": cart_id,
        "plant_id": plant_id,
        "name": format!("Plant {plant_id}"),
        "size": size,
        "quantity": quantity,
        "price": price,
        "selected": true,
    })
}
