//! Back-office menu page: the items table and the categories table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::{ApiCategory, ApiMenuItem};
use crate::display::MenuItemRow;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::admin::{Notice, notice};
use crate::routes::fetch::{Fetched, respond};
use crate::state::AppState;

/// Query parameters for the menu page.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub tab: Option<String>,
    pub notice: Option<String>,
}

/// Back-office menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/menu.html")]
pub struct MenuTemplate {
    pub admin_name: String,
    pub show_categories: bool,
    pub items: Vec<MenuItemRow>,
    pub categories: Vec<ApiCategory>,
    pub message: Option<&'static str>,
    pub notice: Option<Notice>,
}

/// Display the items tab (default) or the categories tab.
///
/// Only the active tab's records are fetched.
#[instrument(skip(state, session, admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MenuQuery>,
) -> Response {
    let show_categories = query.tab.as_deref() == Some("categories");

    let mut page = MenuTemplate {
        admin_name: admin.user.display_name().to_string(),
        show_categories,
        items: Vec::new(),
        categories: Vec::new(),
        message: None,
        notice: notice(query.notice.as_deref()),
    };

    let auth_failed = if show_categories {
        let fetched = Fetched::from_result(
            state.backend().admin_categories(&admin.token).await,
            "Failed to load categories",
            |categories: Vec<ApiCategory>| categories,
        );
        page.message = fetched.message();
        let auth_failed = fetched.is_auth_failure();
        page.categories = fetched.into_records();
        if page.message.is_none() && page.categories.is_empty() {
            page.message = Some("No categories found");
        }
        auth_failed
    } else {
        let presenter = state.presenter();
        let fetched = Fetched::from_result(
            state.backend().admin_menu(&admin.token).await,
            "Failed to load menu items",
            |items: Vec<ApiMenuItem>| {
                items
                    .into_iter()
                    .map(|item| presenter.menu_row(item))
                    .collect::<Vec<_>>()
            },
        );
        page.message = fetched.message();
        let auth_failed = fetched.is_auth_failure();
        page.items = fetched.into_records();
        if page.message.is_none() && page.items.is_empty() {
            page.message = Some("No menu items found");
        }
        auth_failed
    };

    respond(&session, auth_failed, page).await
}
