//! Order placement and order history.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use foodio_core::OrderStatus;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::{ApiOrder, PlaceOrderLine, PlaceOrderRequest};
use crate::display::CustomerOrder;
use crate::filters;
use crate::middleware::RequireCustomer;
use crate::routes::customer::cart::{cart_page, load_cart, save_cart};
use crate::routes::fetch::{Fetched, end_session, login_redirect, respond};
use crate::state::AppState;

/// Place order form data.
#[derive(Debug, Default, Deserialize)]
pub struct PlaceOrderForm {
    #[serde(default)]
    pub delivery_address: String,
}

/// Query parameters for the order history page.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
    pub placed: Option<String>,
}

/// One status filter tab.
#[derive(Debug, Clone)]
pub struct StatusTab {
    pub value: &'static str,
    pub active: bool,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "customer/orders.html")]
pub struct OrdersTemplate {
    pub customer_name: String,
    pub cart_count: u32,
    pub tabs: Vec<StatusTab>,
    pub orders: Vec<CustomerOrder>,
    pub message: Option<String>,
    pub placed: bool,
}

/// Place the cart as an order.
///
/// An empty cart never reaches the backend. On success the cart is emptied
/// and the customer lands on their order history.
#[instrument(skip(state, session, customer, headers, form))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
    headers: HeaderMap,
    Form(form): Form<PlaceOrderForm>,
) -> Response {
    let cart = load_cart(&session).await;
    let address = form.delivery_address.trim().to_string();

    if cart.is_empty() {
        let page = cart_page(
            &state,
            &customer,
            &cart,
            Some("Your cart is empty".to_string()),
            address,
        );
        return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
    }

    let order = PlaceOrderRequest {
        items: cart
            .lines()
            .iter()
            .map(|line| PlaceOrderLine {
                menu_item_id: line.item_id,
                quantity: line.quantity,
            })
            .collect(),
        delivery_address: (!address.is_empty()).then(|| address.clone()),
    };

    match state.backend().place_order(&customer.token, &order).await {
        Ok(()) => {
            tracing::info!(
                user_id = %customer.user.id,
                lines = order.items.len(),
                "Order placed"
            );
            if let Err(e) = save_cart(&session, &foodio_core::Cart::default()).await {
                tracing::error!(error = %e, "Failed to clear cart after order");
            }
            Redirect::to("/customer/orders?placed=1").into_response()
        }
        Err(e) if e.is_unauthorized() => {
            end_session(&session).await;
            login_redirect(&headers)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to place order");
            let message = e
                .backend_message()
                .unwrap_or("Failed to place order")
                .to_string();
            let page = cart_page(&state, &customer, &cart, Some(message), address);
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

/// Display the customer's orders, optionally filtered by status.
#[instrument(skip(state, session, customer))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireCustomer(customer): RequireCustomer,
    Query(query): Query<OrdersQuery>,
) -> Response {
    let filter = parse_filter(query.status.as_deref());

    let fetched = Fetched::from_result(
        state.backend().my_orders(&customer.token).await,
        "Failed to load orders",
        |orders: Vec<ApiOrder>| orders,
    );
    let auth_failed = fetched.is_auth_failure();
    let mut message = fetched.message().map(str::to_string);

    let orders: Vec<CustomerOrder> = fetched
        .into_records()
        .into_iter()
        .filter(|order| filter.is_none_or(|status| order.status() == status))
        .map(|order| state.presenter().customer_order(order))
        .collect();

    if message.is_none() && orders.is_empty() {
        message = Some(match filter {
            Some(status) => format!("No orders found with status: {status}"),
            None => "You haven't placed any orders yet".to_string(),
        });
    }

    let cart = load_cart(&session).await;
    let page = OrdersTemplate {
        customer_name: customer.user.display_name().to_string(),
        cart_count: cart.item_count(),
        tabs: status_tabs(filter),
        orders,
        message,
        placed: query.placed.is_some(),
    };
    respond(&session, auth_failed, page).await
}

/// `ALL`, a missing value, or anything unrecognised means no filter.
fn parse_filter(raw: Option<&str>) -> Option<OrderStatus> {
    raw.and_then(|raw| raw.parse().ok())
}

fn status_tabs(filter: Option<OrderStatus>) -> Vec<StatusTab> {
    std::iter::once(StatusTab {
        value: "ALL",
        active: filter.is_none(),
    })
    .chain(OrderStatus::ALL.iter().map(|status| StatusTab {
        value: status.as_str(),
        active: filter == Some(*status),
    }))
    .collect()
}
