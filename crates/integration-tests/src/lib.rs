//! Integration tests for Foodio.
//!
//! Every test starts its own stub REST backend and its own copy of the web
//! app, each on an ephemeral port, and drives the app over HTTP with a
//! cookie-keeping client that does not follow redirects.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p foodio-integration-tests
//! ```
//!
//! # Stub Backend
//!
//! The stub records every request it receives and answers from canned
//! [`StubData`]. Sign-in succeeds for any password except `wrong`; emails
//! starting with `admin` get the admin role.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use foodio_web::{config::WebConfig, state::AppState};
use reqwest::header::CONTENT_TYPE;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

/// One request the stub backend received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RecordedCall {
    /// Body parsed as JSON, `Null` if it is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Canned records and failure switches for the stub backend.
#[derive(Debug, Default)]
pub struct StubData {
    pub menu: Vec<Value>,
    pub categories: Vec<Value>,
    pub orders: Vec<Value>,
    /// Answer every call carrying a bearer token with 401.
    pub reject_tokens: bool,
    /// Answer every POST, PATCH and DELETE with 500.
    pub fail_mutations: bool,
}

#[derive(Clone, Default)]
struct Stub {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    data: Arc<Mutex<StubData>>,
}

/// A running stub of the Foodio REST backend.
pub struct StubBackend {
    pub url: String,
    stub: Stub,
}

impl StubBackend {
    /// Start the stub on an ephemeral port.
    pub async fn start() -> Self {
        let stub = Stub::default();
        let app = Router::new().fallback(handle).with_state(stub.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener
            .local_addr()
            .expect("Failed to read stub backend address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub backend failed");
        });

        Self {
            url: format!("http://{addr}"),
            stub,
        }
    }

    /// Canned data, for setup.
    pub fn data(&self) -> MutexGuard<'_, StubData> {
        self.stub.data.lock().expect("Stub data lock poisoned")
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.stub
            .calls
            .lock()
            .expect("Stub calls lock poisoned")
            .clone()
    }

    /// Calls matching a method and path.
    #[must_use]
    pub fn calls_to(&self, method: &Method, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == *method && call.path == path)
            .collect()
    }

    /// Calls that changed something on the backend, sign-in excluded.
    #[must_use]
    pub fn mutations(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method != Method::GET && !call.path.starts_with("/auth/"))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.stub
            .calls
            .lock()
            .expect("Stub calls lock poisoned")
            .clear();
    }
}

async fn handle(
    State(stub): State<Stub>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let call = RecordedCall {
        method: method.clone(),
        path: uri.path().to_string(),
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
        body,
    };
    stub.calls
        .lock()
        .expect("Stub calls lock poisoned")
        .push(call.clone());

    let data = stub.data.lock().expect("Stub data lock poisoned");

    if call.authorization.is_some() && data.reject_tokens {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response();
    }

    match (method.as_str(), call.path.as_str()) {
        ("POST", "/auth/login") => login(&call.json()),
        ("POST", "/auth/register") => {
            (StatusCode::CREATED, Json(json!({ "message": "Registered" }))).into_response()
        }
        ("GET", "/user/menu" | "/admin/menu") => Json(data.menu.clone()).into_response(),
        ("GET", "/admin/categories") => Json(data.categories.clone()).into_response(),
        ("GET", "/admin/orders" | "/user/orders") => Json(data.orders.clone()).into_response(),
        ("POST" | "PATCH" | "DELETE", _) if data.fail_mutations => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Database unavailable" })),
        )
            .into_response(),
        ("POST" | "PATCH" | "DELETE", _) => Json(json!({ "success": true })).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Not found" })),
        )
            .into_response(),
    }
}

fn login(body: &Value) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"] == "wrong" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }

    let (id, role, name) = if email.starts_with("admin") {
        (1, "ADMIN", "Ada Admin")
    } else {
        (2, "USER", "Chris Customer")
    };
    Json(json!({
        "accessToken": format!("token-{id}"),
        "user": { "id": id, "role": role, "name": name, "email": email },
    }))
    .into_response()
}

/// A menu item record as the backend sends it.
#[must_use]
pub fn menu_item(id: i32, name: &str, price: &str, category: &str, available: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} from the test kitchen"),
        "price": price,
        "category": { "id": 1, "name": category },
        "imageUrl": null,
        "isAvailable": available,
    })
}

/// An order record as the backend sends it.
#[must_use]
pub fn order(id: i32, status: &str) -> Value {
    json!({
        "id": id,
        "createdAt": "2025-12-12T16:33:00Z",
        "user": { "name": "Chris Customer", "email": "chris@example.com", "address": "12 Lake Road" },
        "totalPrice": "598.00",
        "status": status,
        "orderItems": [
            { "quantity": 2, "price": "299.00", "menuItem": { "name": "Cheese Burger" } }
        ],
    })
}

/// The web app wired to a stub backend.
pub struct TestApp {
    pub url: String,
    pub client: reqwest::Client,
    pub backend: StubBackend,
}

impl TestApp {
    /// Start a stub backend and an app pointed at it.
    pub async fn spawn() -> Self {
        let backend = StubBackend::start().await;
        let backend_url = backend.url.clone();
        let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../web/static");

        let config = WebConfig::from_lookup(|key| match key {
            "FOODIO_BACKEND_URL" => Some(backend_url.clone()),
            "FOODIO_STATIC_DIR" => Some(static_dir.to_string()),
            _ => None,
        })
        .expect("Failed to build test configuration");
        let state = AppState::new(config).expect("Failed to build application state");
        let app = foodio_web::build_router(state, MemoryStore::default());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind app");
        let addr = listener.local_addr().expect("Failed to read app address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("App server failed");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            url: format!("http://{addr}"),
            client,
            backend,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a urlencoded form.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        self.form_request(path, fields)
            .send()
            .await
            .expect("POST request failed")
    }

    /// POST a urlencoded form the way HTMX does.
    pub async fn htmx_post_form(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        self.form_request(path, fields)
            .header("HX-Request", "true")
            .send()
            .await
            .expect("HTMX request failed")
    }

    /// POST a multipart form.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Multipart request failed")
    }

    fn form_request(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::RequestBuilder {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
    }

    /// Sign in through the login form and forget the backend calls it made.
    pub async fn sign_in(&self, email: &str) {
        let response = self
            .post_form("/auth/login", &[("email", email), ("password", "secret123")])
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
        self.backend.clear_calls();
    }

    pub async fn sign_in_admin(&self) {
        self.sign_in("admin@foodio.test").await;
    }

    pub async fn sign_in_customer(&self) {
        self.sign_in("chris@example.com").await;
    }
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
