//! Foodio REST backend client.
//!
//! Every page of the site is a view over this backend. The client is a thin
//! typed wrapper: one method per endpoint, bearer auth from the session
//! token, and error bodies mapped onto [`BackendError`].
//!
//! # Endpoints
//!
//! - `/auth/*`: sign-in and registration
//! - `/user/*`: public menu, order placement and order history
//! - `/admin/*`: menu items, categories and orders (admin token)

mod admin;
mod types;
mod user;

pub use types::*;

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::BackendConfig;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure: connection refused, timeout, bad TLS.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the bearer token (HTTP 401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl BackendError {
    /// Whether the backend rejected the session token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Message from the backend's error body, suitable for a banner.
    ///
    /// Only API and not-found responses carry one, and only when the body
    /// had a `message` field.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::NotFound(message) if !message.is_empty() => {
                Some(message)
            }
            _ => None,
        }
    }
}

/// Client for the Foodio REST backend.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{path}",
            self.inner.base_url.as_str().trim_end_matches('/')
        )
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&SecretString>,
    ) -> reqwest::RequestBuilder {
        let builder = self.inner.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Execute a GET request and parse the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<T, BackendError> {
        let response = self
            .request(reqwest::Method::GET, path, token)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a request with a JSON body and parse the JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self.request(method, path, token).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a request with a JSON body, ignoring any response body.
    pub(crate) async fn send_json_unit<B: Serialize + Sync>(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<(), BackendError> {
        let response = self.request(method, path, token).json(body).send().await?;
        Self::expect_success(response).await
    }

    /// Execute a multipart request, ignoring any response body.
    pub(crate) async fn send_multipart(
        &self,
        method: reqwest::Method,
        path: &str,
        token: &SecretString,
        form: reqwest::multipart::Form,
    ) -> Result<(), BackendError> {
        let response = self
            .request(method, path, Some(token))
            .multipart(form)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete(&self, path: &str, token: &SecretString) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::DELETE, path, Some(token))
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn expect_success(response: reqwest::Response) -> Result<(), BackendError> {
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| BackendError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Map an error response onto [`BackendError`].
    async fn parse_error(response: reqwest::Response) -> BackendError {
        let status = response.status().as_u16();

        if status == 401 {
            return BackendError::Unauthorized;
        }

        let body = response.text().await.unwrap_or_default();

        if status == 404 {
            return BackendError::NotFound(
                extract_message(&body).unwrap_or_else(|| "Resource not found".to_string()),
            );
        }

        BackendError::Api {
            status,
            message: extract_message(&body).unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Pull the `message` field out of an error body.
///
/// Validation failures arrive with `message` as an array of strings; those
/// are joined into one line.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = match value.get("message")? {
        serde_json::Value::String(message) => Some(message.clone()),
        serde_json::Value::Array(parts) => {
            let joined = parts
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    };
    message.filter(|message| !message.trim().is_empty())
}
