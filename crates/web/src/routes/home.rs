//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::display::MenuCard;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Number of menu items featured on the landing page.
pub const FEATURED_COUNT: usize = 5;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<MenuCard>,
    /// Link target for signed-in visitors, e.g. `/admin/menu`.
    pub section_path: Option<&'static str>,
}

/// Display the landing page.
///
/// Shows the first few items of the public menu. A failed fetch is logged
/// and the page renders without featured items.
#[instrument(skip(state, auth))]
pub async fn home(State(state): State<AppState>, auth: OptionalAuth) -> impl IntoResponse {
    let featured = match state.backend().user_menu(None).await {
        Ok(items) => items
            .into_iter()
            .take(FEATURED_COUNT)
            .map(|item| state.presenter().menu_card(item))
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch featured menu items");
            Vec::new()
        }
    };

    HomeTemplate {
        featured,
        section_path: auth.0.map(|signed_in| signed_in.user.role.home_path()),
    }
}
