//! Customer menu with category tabs.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::ApiMenuItem;
use crate::display::{MenuCard, category_tabs};
use crate::filters;
use crate::middleware::RequireCustomer;
use crate::routes::customer::cart::load_cart;
use crate::routes::fetch::{Fetched, respond};
use crate::state::AppState;

/// Query parameters for the menu page.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

/// One category tab.
#[derive(Debug, Clone)]
pub struct CategoryTab {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Customer menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "customer/menu.html")]
pub struct MenuTemplate {
    pub customer_name: String,
    pub cart_count: u32,
    pub tabs: Vec<CategoryTab>,
    pub items: Vec<MenuCard>,
    pub message: Option<&'static str>,
}

/// Display the menu, optionally narrowed to one category.
#[instrument(skip(state, session, customer))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
    Query(query): Query<MenuQuery>,
) -> Response {
    let fetched = Fetched::from_result(
        state.backend().user_menu(Some(&customer.token)).await,
        "Failed to load menu items",
        |items: Vec<ApiMenuItem>| items,
    );
    let auth_failed = fetched.is_auth_failure();
    let mut message = fetched.message();
    let items = fetched.into_records();

    let selected = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));

    let tabs = build_tabs(&category_tabs(&items), selected);

    let cards: Vec<MenuCard> = items
        .into_iter()
        .filter(|item| item.is_available)
        .filter(|item| match selected {
            Some(selected) => item
                .category
                .as_ref()
                .is_some_and(|c| c.name.eq_ignore_ascii_case(selected)),
            None => true,
        })
        .map(|item| state.presenter().menu_card(item))
        .collect();

    if message.is_none() && cards.is_empty() {
        message = Some(if selected.is_some() {
            "No items found in this category"
        } else {
            "No menu items available right now"
        });
    }

    let cart = load_cart(&session).await;
    let page = MenuTemplate {
        customer_name: customer.user.display_name().to_string(),
        cart_count: cart.item_count(),
        tabs,
        items: cards,
        message,
    };
    respond(&session, auth_failed, page).await
}

fn build_tabs(categories: &[String], selected: Option<&str>) -> Vec<CategoryTab> {
    let all = CategoryTab {
        label: "All".to_string(),
        href: "/customer/menu".to_string(),
        active: selected.is_none(),
    };
    std::iter::once(all)
        .chain(categories.iter().map(|name| CategoryTab {
            label: name.clone(),
            href: format!(
                "/customer/menu?category={}",
                url::form_urlencoded::byte_serialize(name.as_bytes()).collect::<String>()
            ),
            active: selected.is_some_and(|s| s.eq_ignore_ascii_case(name)),
        }))
        .collect()
}
