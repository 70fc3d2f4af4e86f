//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Landing page (public)
//!
//! # Auth
//! GET  /auth                          - Sign-in / registration view (?tab=register)
//! POST /auth/login                    - Sign in
//! POST /auth/register                 - Create a customer account
//! POST /auth/logout                   - Sign out
//!
//! # Customer (role user)
//! GET  /customer/menu                 - Menu with category tabs (?category=)
//! GET  /customer/cart                 - Cart page
//! POST /customer/cart/add             - Add to cart (HTMX: returns count badge)
//! POST /customer/cart/update          - Change a line's quantity
//! POST /customer/cart/remove          - Drop a line
//! POST /customer/order                - Place the cart as an order
//! GET  /customer/orders               - Order history (?status=)
//!
//! # Back office (role admin)
//! GET  /admin/menu                    - Menu items or categories (?tab=)
//! GET  /admin/menu/items/new          - Add item form
//! POST /admin/menu/items              - Create item (multipart)
//! GET  /admin/menu/items/{id}/edit    - Edit item form
//! POST /admin/menu/items/{id}         - Update item (multipart)
//! POST /admin/menu/items/{id}/delete  - Delete item
//! GET  /admin/categories/new          - Add category form
//! POST /admin/categories              - Create category
//! POST /admin/categories/{id}/delete  - Delete category
//! GET  /admin/orders                  - Orders table
//! POST /admin/orders/{id}/status      - Set status (HTMX: returns status cell)
//! ```

pub mod admin;
pub mod auth;
pub mod customer;
pub mod fetch;
pub mod home;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderMap,
    routing::{get, post},
};

use crate::state::AppState;

/// Request body ceiling for the menu item forms.
///
/// Set above the 2 MiB image limit so oversized uploads reach validation
/// and get a field message instead of a bare 413.
pub const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Whether the request was issued by HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::auth_page))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(customer::menu::index))
        .route("/cart", get(customer::cart::show))
        .route("/cart/add", post(customer::cart::add))
        .route("/cart/update", post(customer::cart::update))
        .route("/cart/remove", post(customer::cart::remove))
        .route("/order", post(customer::orders::place))
        .route("/orders", get(customer::orders::index))
}

/// Create the back-office routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/menu", get(admin::menu::index))
        .route("/menu/items/new", get(admin::items::new_form))
        .route("/menu/items", post(admin::items::create))
        .route("/menu/items/{id}/edit", get(admin::items::edit_form))
        .route("/menu/items/{id}", post(admin::items::update))
        .route("/menu/items/{id}/delete", post(admin::items::delete))
        .route("/categories/new", get(admin::categories::new_form))
        .route("/categories", post(admin::categories::create))
        .route("/categories/{id}/delete", post(admin::categories::delete))
        .route("/orders", get(admin::orders::index))
        .route("/orders/{id}/status", post(admin::orders::update_status))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/auth", auth_routes())
        .nest("/customer", customer_routes())
        .nest("/admin", admin_routes())
}
