//! Cart route handlers.
//!
//! The cart lives in the session. Names and prices come from the backend
//! menu at the time an item is added, never from the submitted form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use foodio_core::{Cart, MenuItemId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::display::CartLineView;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireCustomer;
use crate::models::{SignedIn, keys};
use crate::routes::fetch::{end_session, login_redirect};
use crate::routes::is_htmx;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart from the session. An unreadable cart reads as empty.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    if cart.is_empty() {
        session.remove::<Cart>(keys::CART).await?;
    } else {
        session.insert(keys::CART, cart).await?;
    }
    Ok(())
}

// =============================================================================
// Form Types
// =============================================================================

const fn default_quantity() -> u32 {
    1
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: MenuItemId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Update cart quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: MenuItemId,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: MenuItemId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "customer/cart.html")]
pub struct CartTemplate {
    pub customer_name: String,
    pub cart_count: u32,
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub message: Option<String>,
    pub delivery_address: String,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart_count: u32,
}

/// Build the cart page for a customer.
#[must_use]
pub fn cart_page(
    state: &AppState,
    customer: &SignedIn,
    cart: &Cart,
    message: Option<String>,
    delivery_address: String,
) -> CartTemplate {
    let presenter = state.presenter();
    CartTemplate {
        customer_name: customer.user.display_name().to_string(),
        cart_count: cart.item_count(),
        lines: cart.lines().iter().map(|line| presenter.cart_line(line)).collect(),
        subtotal: presenter.price(cart.subtotal()),
        message,
        delivery_address,
    }
}

// =============================================================================
// Routes
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, session, customer))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    cart_page(&state, &customer, &cart, None, String::new())
}

/// Add an item to the cart.
///
/// HTMX requests get the refreshed count badge; plain form posts are sent
/// back to the menu.
#[instrument(skip(state, session, customer, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let menu = match state.backend().user_menu(Some(&customer.token)).await {
        Ok(menu) => menu,
        Err(e) if e.is_unauthorized() => {
            end_session(&session).await;
            return Ok(login_redirect(&headers));
        }
        Err(e) => return Err(AppError::Backend(e)),
    };

    let Some(item) = menu
        .into_iter()
        .find(|item| item.id == form.item_id && item.is_available)
    else {
        return Err(AppError::NotFound(format!("menu item {}", form.item_id)));
    };

    let mut cart = load_cart(&session).await;
    cart.add(item.id, item.name, item.price, form.quantity);
    save_cart(&session, &cart).await?;
    tracing::debug!(item_id = %item.id, count = cart.item_count(), "Added to cart");

    if is_htmx(&headers) {
        Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                cart_count: cart.item_count(),
            },
        )
            .into_response())
    } else {
        Ok(Redirect::to("/customer/menu").into_response())
    }
}

/// Change a line's quantity. Zero removes the line.
#[instrument(skip(session, _customer))]
pub async fn update(
    session: Session,
    RequireCustomer(_customer): RequireCustomer,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    cart.set_quantity(form.item_id, form.quantity);
    save_cart(&session, &cart).await?;
    Ok(Redirect::to("/customer/cart"))
}

/// Drop a line from the cart.
#[instrument(skip(session, _customer))]
pub async fn remove(
    session: Session,
    RequireCustomer(_customer): RequireCustomer,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    cart.remove(form.item_id);
    save_cart(&session, &cart).await?;
    Ok(Redirect::to("/customer/cart"))
}
