//! The fetch/display cycle shared by every list page.
//!
//! A page fetches its records, maps them through the presenter and renders.
//! Failures never become error pages: the page renders with a message. A
//! backend 401 additionally destroys the session and schedules exactly one
//! delayed redirect to the login view through a `Refresh` header.

use axum::{
    http::{HeaderMap, HeaderName, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::backend::BackendError;
use crate::error::clear_sentry_user;
use crate::middleware::clear_session;
use crate::routes::is_htmx;

/// Shown when the backend rejects the session token.
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed. Please login again.";

/// Delay before the browser is sent to the login view, in seconds.
pub const AUTH_REDIRECT_DELAY_SECS: u32 = 2;

const REFRESH: HeaderName = HeaderName::from_static("refresh");

/// Outcome of fetching a page's records.
#[derive(Debug)]
pub enum Fetched<T> {
    Loaded(T),
    /// The backend answered 401.
    AuthFailed,
    /// Any other failure, with the page's generic message.
    Failed(&'static str),
}

impl<T> Fetched<T> {
    /// Classify a backend result, mapping successful records with `map`.
    pub fn from_result<R>(
        result: Result<R, BackendError>,
        failure: &'static str,
        map: impl FnOnce(R) -> T,
    ) -> Self {
        match result {
            Ok(records) => Self::Loaded(map(records)),
            Err(BackendError::Unauthorized) => {
                tracing::warn!("Backend rejected the session token");
                Self::AuthFailed
            }
            Err(e) => {
                tracing::error!(error = %e, "{failure}");
                Self::Failed(failure)
            }
        }
    }

    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthFailed)
    }

    /// Message to render in place of the records, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loaded(_) => None,
            Self::AuthFailed => Some(AUTH_FAILED_MESSAGE),
            Self::Failed(message) => Some(*message),
        }
    }
}

impl<T: Default> Fetched<T> {
    /// The records, or an empty collection on failure.
    pub fn into_records(self) -> T {
        match self {
            Self::Loaded(records) => records,
            Self::AuthFailed | Self::Failed(_) => T::default(),
        }
    }
}

/// Value of the `Refresh` header sent after a 401.
#[must_use]
pub fn login_refresh() -> String {
    format!("{AUTH_REDIRECT_DELAY_SECS}; url=/auth")
}

/// Finish a page render.
///
/// When the fetch hit a 401 the session is destroyed and the page carries a
/// single `Refresh` header pointing at `/auth`.
pub async fn respond(session: &Session, auth_failed: bool, page: impl IntoResponse) -> Response {
    if !auth_failed {
        return page.into_response();
    }

    end_session(session).await;
    ([(REFRESH, login_refresh())], page).into_response()
}

/// Destroy the session after the backend rejected its token.
pub async fn end_session(session: &Session) {
    if let Err(e) = clear_session(session).await {
        tracing::warn!(error = %e, "Failed to clear session");
    }
    clear_sentry_user();
}

/// Send the browser to the login view after a backend 401.
///
/// HTMX requests are told to navigate with `HX-Redirect`, since a 303 would
/// only be followed inside the XHR.
#[must_use]
pub fn login_redirect(headers: &HeaderMap) -> Response {
    const TARGET: &str = "/auth?error=session_expired";
    if is_htmx(headers) {
        (StatusCode::OK, AppendHeaders([("HX-Redirect", TARGET)])).into_response()
    } else {
        Redirect::to(TARGET).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result_classifies() {
        let ok: Fetched<Vec<u8>> = Fetched::from_result(Ok(vec![1, 2]), "Failed", |v| v);
        assert!(ok.message().is_none());
        assert_eq!(ok.into_records(), vec![1, 2]);

        let unauthorized: Fetched<Vec<u8>> = Fetched::from_result(
            Err(BackendError::Unauthorized),
            "Failed to load orders",
            |v: Vec<u8>| v,
        );
        assert!(unauthorized.is_auth_failure());
        assert_eq!(unauthorized.message(), Some(AUTH_FAILED_MESSAGE));

        let failed: Fetched<Vec<u8>> = Fetched::from_result(
            Err(BackendError::Parse("bad json".to_string())),
            "Failed to load orders",
            |v: Vec<u8>| v,
        );
        assert_eq!(failed.message(), Some("Failed to load orders"));
        assert!(failed.into_records().is_empty());
    }

    #[test]
    fn test_login_refresh_value() {
        assert_eq!(login_refresh(), "2; url=/auth");
    }
}
