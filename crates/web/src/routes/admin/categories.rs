//! Add and delete categories.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use foodio_core::validation::validate_category;
use foodio_core::{CategoryId, ValidationErrors};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::admin::items::{failure_status, submit_failure};
use crate::routes::fetch::{end_session, login_redirect};
use crate::state::AppState;

/// Add category form data.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
}

/// Add category form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/category_form.html")]
pub struct CategoryFormTemplate {
    pub admin_name: String,
    pub name: String,
    pub errors: ValidationErrors,
    pub banner: Option<String>,
}

/// Display the add category form.
#[instrument(skip(admin))]
pub async fn new_form(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
    CategoryFormTemplate {
        admin_name: admin.user.display_name().to_string(),
        name: String::new(),
        errors: ValidationErrors::new(),
        banner: None,
    }
}

/// Handle the add category form.
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<CategoryForm>,
) -> Response {
    let mut page = CategoryFormTemplate {
        admin_name: admin.user.display_name().to_string(),
        name: form.name.clone(),
        errors: ValidationErrors::new(),
        banner: None,
    };

    let name = match validate_category(&form.name) {
        Ok(name) => name,
        Err(errors) => {
            page.errors = errors;
            return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
        }
    };

    match state.backend().create_category(&admin.token, &name).await {
        Ok(()) => {
            tracing::info!(name = %name, "Category created");
            Redirect::to("/admin/menu?tab=categories&notice=category_created").into_response()
        }
        Err(e) => {
            page.banner = Some(submit_failure(&e, "Failed to create category"));
            (failure_status(&e), page).into_response()
        }
    }
}

/// Delete a category and return to the categories tab.
#[instrument(skip(state, session, admin, headers))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<CategoryId>,
) -> Response {
    match state.backend().delete_category(&admin.token, id).await {
        Ok(()) => {
            tracing::info!(category_id = %id, "Category deleted");
            Redirect::to("/admin/menu?tab=categories&notice=category_deleted").into_response()
        }
        Err(e) if e.is_unauthorized() => {
            end_session(&session).await;
            login_redirect(&headers)
        }
        Err(e) => {
            tracing::error!(category_id = %id, error = %e, "Failed to delete category");
            Redirect::to("/admin/menu?tab=categories&notice=delete_category_failed")
                .into_response()
        }
    }
}
