//! Role gate extractors.
//!
//! [`RequireAdmin`] guards the back office and [`RequireCustomer`] guards the
//! customer section. Both read the token and user record from the session and
//! apply [`check_access`]:
//!
//! - no token, or no readable user record: redirect to `/auth`
//! - signed in with the other role: redirect to that role's home
//!
//! The gate only steers navigation. Token validity is the backend's call; a
//! backend 401 is handled where the call is made.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use foodio_core::{Access, Role, SessionUser, check_access};
use secrecy::SecretString;
use tower_sessions::Session;

use crate::models::{SignedIn, keys};

/// Extractor that requires an admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.user.display_name())
/// }
/// ```
pub struct RequireAdmin(pub SignedIn);

/// Extractor that requires a customer session.
pub struct RequireCustomer(pub SignedIn);

/// Extractor that reads the session without rejecting anonymous visitors.
///
/// Yields `None` unless both a token and a readable user record are present.
pub struct OptionalAuth(pub Option<SignedIn>);

/// Rejection produced by the gate extractors.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to the login view or the visitor's own section.
    Redirect(&'static str),
    /// Unauthorized response when no session layer ran.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(path) => Redirect::to(path).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        gate(parts, Role::Admin).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for RequireCustomer
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        gate(parts, Role::User).await.map(Self)
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let signed_in = match parts.extensions.get::<Session>() {
            Some(session) => match read_session(session).await {
                (Some(token), Some(user)) if !token.trim().is_empty() => Some(SignedIn {
                    token: SecretString::from(token),
                    user,
                }),
                _ => None,
            },
            None => None,
        };

        Ok(Self(signed_in))
    }
}

async fn gate(parts: &Parts, required: Role) -> Result<SignedIn, AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::Unauthorized)?;

    let (token, user) = read_session(session).await;

    match (check_access(token.as_deref(), user.as_ref(), required), token, user) {
        (Access::Granted, Some(token), Some(user)) => Ok(SignedIn {
            token: SecretString::from(token),
            user,
        }),
        (access, _, _) => {
            tracing::debug!(path = %parts.uri.path(), ?access, "Gate redirect");
            Err(AuthRejection::Redirect(
                access.redirect_path().unwrap_or("/auth"),
            ))
        }
    }
}

/// Read the token and user record. An unreadable user record reads as `None`.
async fn read_session(session: &Session) -> (Option<String>, Option<SessionUser>) {
    let token = session.get::<String>(keys::TOKEN).await.ok().flatten();
    let user = match session.get::<SessionUser>(keys::USER).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable session user record");
            None
        }
    };
    (token, user)
}

/// Store a fresh sign-in, rotating the session ID first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_signed_in(
    session: &Session,
    token: &str,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::TOKEN, token).await?;
    session.insert(keys::USER, user).await
}

/// Destroy the session (logout, or a backend 401).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, header},
        routing::get,
    };
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use super::*;

    async fn seed(session: Session) -> StatusCode {
        session.insert(keys::TOKEN, "tok-123").await.unwrap();
        session
            .insert(keys::USER, serde_json::json!({"id": "seven", "role": "chef"}))
            .await
            .unwrap();
        StatusCode::NO_CONTENT
    }

    async fn seed_customer(session: Session) -> StatusCode {
        session.insert(keys::TOKEN, "tok-123").await.unwrap();
        session
            .insert(keys::USER, serde_json::json!({"id": 7, "role": "USER"}))
            .await
            .unwrap();
        StatusCode::NO_CONTENT
    }

    async fn admin_only(RequireAdmin(admin): RequireAdmin) -> String {
        admin.user.id.to_string()
    }

    async fn customer_only(RequireCustomer(customer): RequireCustomer) -> String {
        customer.user.id.to_string()
    }

    fn router() -> Router {
        Router::new()
            .route("/seed/malformed", get(seed))
            .route("/seed/customer", get(seed_customer))
            .route("/admin/menu", get(admin_only))
            .route("/customer/menu", get(customer_only))
            .layer(SessionManagerLayer::new(MemoryStore::default()))
    }

    async fn session_cookie(app: &Router, seed_path: &str) -> String {
        let response = app
            .clone()
            .oneshot(Request::get(seed_path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn get_with_cookie(app: &Router, path: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::get(path);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_redirects_to_login() {
        let app = router();
        let response = get_with_cookie(&app, "/admin/menu", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth");
    }

    #[tokio::test]
    async fn test_malformed_user_record_redirects_to_login() {
        let app = router();
        let cookie = session_cookie(&app, "/seed/malformed").await;
        let response = get_with_cookie(&app, "/customer/menu", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth");
    }

    #[tokio::test]
    async fn test_customer_on_admin_section_goes_home() {
        let app = router();
        let cookie = session_cookie(&app, "/seed/customer").await;

        let response = get_with_cookie(&app, "/admin/menu", Some(&cookie)).await;
        assert_eq!(location(&response), "/customer/menu");

        let response = get_with_cookie(&app, "/customer/menu", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_unauthorized_rejection_status() {
        let response = AuthRejection::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
