//! Sign-in, registration and sign-out route handlers.
//!
//! Both forms live on one page, `/auth`, switched by `?tab=register`.
//! Validation failures re-render the page with HTTP 422 and never reach the
//! backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use foodio_core::ValidationErrors;
use foodio_core::validation::{RegistrationInput, validate_login, validate_registration};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::BackendError;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_session, set_signed_in};
use crate::routes::fetch::AUTH_FAILED_MESSAGE;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form data.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub password: String,
}

/// Query parameters for the auth page.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    pub tab: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Values echoed back into the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterValues {
    pub full_name: String,
    pub email: String,
    pub address: String,
}

/// Sign-in / registration page template.
#[derive(Template, WebTemplate, Default)]
#[template(path = "auth.html")]
pub struct AuthTemplate {
    pub show_register: bool,
    pub error: Option<String>,
    pub success: Option<&'static str>,
    pub login_email: String,
    pub login_errors: ValidationErrors,
    pub register: RegisterValues,
    pub register_errors: ValidationErrors,
}

fn error_message(code: &str) -> &'static str {
    match code {
        "session_expired" => AUTH_FAILED_MESSAGE,
        "session" => "Could not start your session. Please try again.",
        _ => "Something went wrong. Please try again.",
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the auth page. Signed-in visitors are sent to their section.
#[instrument(skip(auth))]
pub async fn auth_page(auth: OptionalAuth, Query(query): Query<AuthQuery>) -> Response {
    if let OptionalAuth(Some(signed_in)) = auth {
        return Redirect::to(signed_in.user.role.home_path()).into_response();
    }

    AuthTemplate {
        show_register: query.tab.as_deref() == Some("register"),
        error: query.error.as_deref().map(|code| error_message(code).to_string()),
        success: query
            .success
            .as_deref()
            .filter(|code| *code == "registered")
            .map(|_| "Account created. Please sign in."),
        ..AuthTemplate::default()
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let credentials = match validate_login(&form.email, &form.password) {
        Ok(credentials) => credentials,
        Err(errors) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                AuthTemplate {
                    login_email: form.email,
                    login_errors: errors,
                    ..AuthTemplate::default()
                },
            )
                .into_response();
        }
    };

    match state.backend().login(&credentials).await {
        Ok(response) => {
            if let Err(e) = set_signed_in(&session, &response.token, &response.user).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth?error=session").into_response();
            }
            set_sentry_user(&response.user.id, response.user.email.as_deref());
            tracing::info!(user_id = %response.user.id, role = %response.user.role, "Signed in");
            Redirect::to(response.user.role.home_path()).into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            let (status, message) = match &e {
                BackendError::Unauthorized
                | BackendError::NotFound(_)
                | BackendError::Api {
                    status: 400 | 403, ..
                } => (
                    StatusCode::UNAUTHORIZED,
                    e.backend_message()
                        .unwrap_or("Invalid email or password")
                        .to_string(),
                ),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "Sign in failed. Please try again.".to_string(),
                ),
            };
            (
                status,
                AuthTemplate {
                    error: Some(message),
                    login_email: form.email,
                    ..AuthTemplate::default()
                },
            )
                .into_response()
        }
    }
}

/// Handle registration form submission.
///
/// The new account is not signed in; the visitor is sent back to the login
/// tab with a confirmation.
#[instrument(skip(state, form))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let input = RegistrationInput {
        full_name: form.full_name,
        email: form.email,
        address: form.address,
        password: form.password,
    };
    let values = RegisterValues {
        full_name: input.full_name.clone(),
        email: input.email.clone(),
        address: input.address.clone(),
    };

    let registration = match validate_registration(&input) {
        Ok(registration) => registration,
        Err(errors) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                AuthTemplate {
                    show_register: true,
                    register: values,
                    register_errors: errors,
                    ..AuthTemplate::default()
                },
            )
                .into_response();
        }
    };

    match state.backend().register(&registration).await {
        Ok(()) => {
            tracing::info!(email = %registration.email, "Registered customer");
            Redirect::to("/auth?success=registered").into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            let status = if matches!(e, BackendError::Api { .. }) {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_GATEWAY
            };
            (
                status,
                AuthTemplate {
                    show_register: true,
                    error: Some(e.backend_message().unwrap_or("Registration failed").to_string()),
                    register: values,
                    ..AuthTemplate::default()
                },
            )
                .into_response()
        }
    }
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_session(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    clear_sentry_user();
    Redirect::to("/auth").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(error_message("session_expired"), AUTH_FAILED_MESSAGE);
        assert_eq!(
            error_message("bogus"),
            "Something went wrong. Please try again."
        );
    }
}
