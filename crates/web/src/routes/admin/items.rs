//! Add, edit and delete menu items.
//!
//! Both item forms post `multipart/form-data` so an image can ride along.
//! The form is validated before anything is sent; a failing form comes back
//! with HTTP 422 and the submitted values, minus the file.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use foodio_core::validation::{ImageCheck, MAX_IMAGE_BYTES, MenuItemInput, validate_menu_item};
use foodio_core::{MenuItemId, ValidationErrors};
use secrecy::SecretString;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::{ApiCategory, BackendClient, BackendError, ImageUpload, MenuItemUpdate};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::admin::UNAUTHORIZED_SUBMIT_MESSAGE;
use crate::routes::fetch::{AUTH_FAILED_MESSAGE, Fetched, end_session, login_redirect, respond};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Everything one item form submission carried.
#[derive(Debug, Default)]
pub struct ItemSubmission {
    pub input: MenuItemInput,
    pub available: bool,
    pub remove_image: bool,
    pub image: Option<ImageUpload>,
    /// The upload overran the request body limit and was dropped.
    pub image_too_large: bool,
}

impl ItemSubmission {
    /// Read the multipart body.
    ///
    /// An empty file input is treated as "no image". When the body limit
    /// trips while reading the image, the image is flagged as too large and
    /// the remaining fields are dropped; the form puts the file input last.
    ///
    /// # Errors
    ///
    /// Returns a 400 for a body that is not valid multipart.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut submission = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) if bytes.is_empty() || file_name.is_empty() => {}
                    Ok(bytes) => {
                        submission.image = Some(ImageUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                    Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                        tracing::debug!("Image upload exceeded the body limit");
                        submission.image_too_large = true;
                        break;
                    }
                    Err(e) => return Err(malformed(e)),
                }
                continue;
            }

            let value = field.text().await.map_err(malformed)?;
            match name.as_str() {
                "name" => submission.input.name = value,
                "price" => submission.input.price = value,
                "category" | "categoryName" => submission.input.category = value,
                "description" => submission.input.description = value,
                "availableForOrder" => submission.available = is_checked(&value),
                "removeImage" => submission.remove_image = is_checked(&value),
                _ => {}
            }
        }

        Ok(submission)
    }

    fn image_check(&self) -> Option<ImageCheck<'_>> {
        if self.image_too_large {
            return Some(ImageCheck {
                size: MAX_IMAGE_BYTES + 1,
                content_type: "",
            });
        }
        self.image.as_ref().map(|image| ImageCheck {
            size: image.bytes.len(),
            content_type: &image.content_type,
        })
    }
}

fn is_checked(value: &str) -> bool {
    matches!(value, "true" | "on" | "1")
}

fn malformed(e: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid form data: {}", e.body_text()))
}

// =============================================================================
// Templates
// =============================================================================

/// Values shown in the item form inputs.
#[derive(Debug, Clone, Default)]
pub struct ItemFormValues {
    pub name: String,
    pub price: String,
    pub category: String,
    pub description: String,
    pub available: bool,
    pub current_image: Option<String>,
}

impl ItemFormValues {
    /// Echo a submission back. The stored image is not shown again.
    fn from_submission(submission: &ItemSubmission) -> Self {
        Self {
            name: submission.input.name.clone(),
            price: submission.input.price.clone(),
            category: submission.input.category.clone(),
            description: submission.input.description.clone(),
            available: submission.available,
            current_image: None,
        }
    }
}

/// One `<option>` of the category select.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Add/edit item form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/item_form.html")]
pub struct ItemFormTemplate {
    pub admin_name: String,
    /// `None` when adding.
    pub item_id: Option<MenuItemId>,
    pub action: String,
    pub values: ItemFormValues,
    pub categories: Vec<CategoryOption>,
    /// Shown instead of the category select when it cannot be filled.
    pub categories_message: Option<&'static str>,
    pub errors: ValidationErrors,
    pub banner: Option<String>,
}

impl ItemFormTemplate {
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.item_id.is_some()
    }
}

/// Category names for the select, with a message when there are none.
struct CategoryChoices {
    names: Vec<String>,
    message: Option<&'static str>,
    auth_failed: bool,
}

async fn load_categories(backend: &BackendClient, token: &SecretString) -> CategoryChoices {
    let fetched = Fetched::from_result(
        backend.admin_categories(token).await,
        "Failed to load categories",
        |categories: Vec<ApiCategory>| {
            categories
                .into_iter()
                .map(|category| category.name)
                .collect::<Vec<_>>()
        },
    );
    let auth_failed = fetched.is_auth_failure();
    let mut message = fetched.message();
    let names = fetched.into_records();
    if message.is_none() && names.is_empty() {
        message = Some("No categories found. Please add categories first.");
    }
    CategoryChoices {
        names,
        message,
        auth_failed,
    }
}

fn category_options(names: &[String], selected: &str) -> Vec<CategoryOption> {
    names
        .iter()
        .map(|name| CategoryOption {
            selected: name.eq_ignore_ascii_case(selected.trim()),
            name: name.clone(),
        })
        .collect()
}

fn form_page(
    admin_name: &str,
    item_id: Option<MenuItemId>,
    values: ItemFormValues,
    choices: &CategoryChoices,
) -> ItemFormTemplate {
    let action = item_id.map_or_else(
        || "/admin/menu/items".to_string(),
        |id| format!("/admin/menu/items/{id}"),
    );
    ItemFormTemplate {
        admin_name: admin_name.to_string(),
        item_id,
        action,
        categories: category_options(&choices.names, &values.category),
        categories_message: choices.message,
        values,
        errors: ValidationErrors::new(),
        banner: None,
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the add item form.
#[instrument(skip(state, session, admin))]
pub async fn new_form(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
) -> Response {
    let choices = load_categories(state.backend(), &admin.token).await;
    let values = ItemFormValues {
        category: choices.names.first().cloned().unwrap_or_default(),
        available: true,
        ..ItemFormValues::default()
    };
    let page = form_page(admin.user.display_name(), None, values, &choices);
    respond(&session, choices.auth_failed, page).await
}

/// Handle the add item form.
#[instrument(skip(state, admin, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<Response> {
    let submission = ItemSubmission::read(multipart).await?;

    let draft = match validate_menu_item(&submission.input, submission.image_check()) {
        Ok(draft) => draft,
        Err(errors) => {
            let choices = load_categories(state.backend(), &admin.token).await;
            let values = ItemFormValues::from_submission(&submission);
            let mut page = form_page(admin.user.display_name(), None, values, &choices);
            page.errors = errors;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let values = ItemFormValues::from_submission(&submission);
    match state
        .backend()
        .create_menu_item(&admin.token, &draft, submission.image)
        .await
    {
        Ok(()) => {
            tracing::info!(name = %draft.name, "Menu item created");
            Ok(Redirect::to("/admin/menu?tab=items&notice=item_created").into_response())
        }
        Err(e) => {
            let banner = submit_failure(&e, "Failed to create menu item");
            let choices = load_categories(state.backend(), &admin.token).await;
            let mut page = form_page(admin.user.display_name(), None, values, &choices);
            page.banner = Some(banner);
            Ok((failure_status(&e), page).into_response())
        }
    }
}

/// Display the edit item form, prefilled from the backend.
#[instrument(skip(state, session, admin))]
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<MenuItemId>,
) -> Result<Response> {
    let item = match state.backend().admin_menu(&admin.token).await {
        Ok(items) => items.into_iter().find(|item| item.id == id),
        Err(BackendError::Unauthorized) => {
            let choices = CategoryChoices {
                names: Vec::new(),
                message: None,
                auth_failed: true,
            };
            let mut page = form_page(
                admin.user.display_name(),
                Some(id),
                ItemFormValues::default(),
                &choices,
            );
            page.banner = Some(AUTH_FAILED_MESSAGE.to_string());
            return Ok(respond(&session, true, page).await);
        }
        Err(e) => return Err(e.into()),
    };
    let Some(item) = item else {
        return Err(AppError::NotFound(format!("menu item {id}")));
    };

    let row = state.presenter().menu_row(item);
    let values = ItemFormValues {
        category: if row.category == "N/A" {
            String::new()
        } else {
            row.category
        },
        name: row.name,
        price: row.raw_price,
        description: row.description,
        available: row.available,
        current_image: row.image,
    };

    let choices = load_categories(state.backend(), &admin.token).await;
    let page = form_page(admin.user.display_name(), Some(id), values, &choices);
    Ok(respond(&session, choices.auth_failed, page).await)
}

/// Handle the edit item form.
#[instrument(skip(state, admin, multipart))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<MenuItemId>,
    multipart: Multipart,
) -> Result<Response> {
    let submission = ItemSubmission::read(multipart).await?;

    let draft = match validate_menu_item(&submission.input, submission.image_check()) {
        Ok(draft) => draft,
        Err(errors) => {
            let choices = load_categories(state.backend(), &admin.token).await;
            let values = ItemFormValues::from_submission(&submission);
            let mut page = form_page(admin.user.display_name(), Some(id), values, &choices);
            page.errors = errors;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let values = ItemFormValues::from_submission(&submission);
    let update = MenuItemUpdate {
        available: submission.available,
        remove_image: submission.remove_image && submission.image.is_none(),
        image: submission.image,
    };

    match state
        .backend()
        .update_menu_item(&admin.token, id, &draft, update)
        .await
    {
        Ok(()) => {
            tracing::info!(item_id = %id, "Menu item updated");
            Ok(Redirect::to("/admin/menu?tab=items&notice=item_updated").into_response())
        }
        Err(e) => {
            let banner = submit_failure(&e, "Failed to update menu item");
            let choices = load_categories(state.backend(), &admin.token).await;
            let mut page = form_page(admin.user.display_name(), Some(id), values, &choices);
            page.banner = Some(banner);
            Ok((failure_status(&e), page).into_response())
        }
    }
}

/// Delete an item and return to the items tab.
#[instrument(skip(state, session, admin, headers))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<MenuItemId>,
) -> Response {
    match state.backend().delete_menu_item(&admin.token, id).await {
        Ok(()) => {
            tracing::info!(item_id = %id, "Menu item deleted");
            Redirect::to("/admin/menu?tab=items&notice=item_deleted").into_response()
        }
        Err(e) if e.is_unauthorized() => {
            end_session(&session).await;
            login_redirect(&headers)
        }
        Err(e) => {
            tracing::error!(item_id = %id, error = %e, "Failed to delete menu item");
            Redirect::to("/admin/menu?tab=items&notice=delete_item_failed").into_response()
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Banner text for a failed submission.
///
/// A rejected token keeps the session; the admin can sign in again in
/// another tab and resubmit without losing the form.
pub(crate) fn submit_failure(e: &BackendError, fallback: &'static str) -> String {
    if e.is_unauthorized() {
        tracing::warn!("Backend rejected the admin token on submit");
        return UNAUTHORIZED_SUBMIT_MESSAGE.to_string();
    }
    tracing::error!(error = %e, "{fallback}");
    e.backend_message().unwrap_or(fallback).to_string()
}

pub(crate) const fn failure_status(e: &BackendError) -> StatusCode {
    match e {
        BackendError::Unauthorized => StatusCode::UNAUTHORIZED,
        BackendError::Api { status: 400..=499, .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_category_options_selects_case_insensitively() {
        let names = vec!["Main".to_string(), "Drinks".to_string()];
        let options = category_options(&names, " drinks ");
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }

    #[test]
    fn test_oversized_image_fails_validation() {
        let submission = ItemSubmission {
            input: MenuItemInput {
                name: "Soup".to_string(),
                price: "120".to_string(),
                category: "Main".to_string(),
                description: "Hot".to_string(),
            },
            image_too_large: true,
            ..ItemSubmission::default()
        };
        let errors = validate_menu_item(&submission.input, submission.image_check()).unwrap_err();
        assert_eq!(errors.get("image"), Some("Image size must be maximum 2MB"));
    }

    #[test]
    fn test_submit_failure_messages() {
        assert_eq!(
            submit_failure(&BackendError::Unauthorized, "Failed to create menu item"),
            UNAUTHORIZED_SUBMIT_MESSAGE
        );
        let conflict = BackendError::Api {
            status: 409,
            message: "Menu item already exists".to_string(),
        };
        assert_eq!(
            submit_failure(&conflict, "Failed to create menu item"),
            "Menu item already exists"
        );
        assert_eq!(failure_status(&conflict), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            submit_failure(&BackendError::Parse("x".into()), "Failed to create menu item"),
            "Failed to create menu item"
        );
    }

    #[test]
    fn test_is_checked() {
        assert!(is_checked("true"));
        assert!(is_checked("on"));
        assert!(!is_checked("false"));
    }
}
