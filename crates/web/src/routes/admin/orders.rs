//! Back-office orders table and status changes.
//!
//! Choosing a status in a row's select posts it immediately. HTMX swaps
//! the returned cell into place; without HTMX the browser is redirected
//! back to the table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use foodio_core::{OrderId, OrderStatus};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::ApiOrder;
use crate::display::{OrderRow, StatusCell};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::admin::{Notice, notice};
use crate::routes::fetch::{Fetched, end_session, login_redirect, respond};
use crate::routes::is_htmx;
use crate::state::AppState;

/// Query parameters for the orders page.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub notice: Option<String>,
}

/// Status select form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    /// Status shown before the change, restored if the change fails.
    pub previous: Option<String>,
}

/// Orders table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersTemplate {
    pub admin_name: String,
    pub orders: Vec<OrderRow>,
    pub message: Option<&'static str>,
    pub notice: Option<Notice>,
}

/// Status cell fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_status.html")]
pub struct OrderStatusTemplate {
    pub cell: StatusCell,
}

/// Display every order.
#[instrument(skip(state, session, admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<OrdersQuery>,
) -> Response {
    let presenter = state.presenter();
    let fetched = Fetched::from_result(
        state.backend().admin_orders(&admin.token).await,
        "Failed to load orders",
        |orders: Vec<ApiOrder>| {
            orders
                .into_iter()
                .map(|order| presenter.order_row(order))
                .collect::<Vec<_>>()
        },
    );
    let auth_failed = fetched.is_auth_failure();
    let mut message = fetched.message();
    let orders = fetched.into_records();
    if message.is_none() && orders.is_empty() {
        message = Some("No orders found");
    }

    let page = OrdersTemplate {
        admin_name: admin.user.display_name().to_string(),
        orders,
        message,
        notice: notice(query.notice.as_deref()),
    };
    respond(&session, auth_failed, page).await
}

/// Set one order's status with a single PATCH.
///
/// An unrecognised status is rejected before the backend is called.
#[instrument(skip(state, session, admin, headers, form))]
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let status: OrderStatus = form
        .status
        .parse()
        .map_err(AppError::BadRequest)?;

    match state
        .backend()
        .update_order_status(&admin.token, id, status)
        .await
    {
        Ok(()) => {
            tracing::info!(order_id = %id, status = %status, "Order status updated");
            if is_htmx(&headers) {
                Ok(OrderStatusTemplate {
                    cell: StatusCell::new(id, status),
                }
                .into_response())
            } else {
                Ok(Redirect::to("/admin/orders").into_response())
            }
        }
        Err(e) if e.is_unauthorized() => {
            end_session(&session).await;
            Ok(login_redirect(&headers))
        }
        Err(e) => {
            tracing::error!(order_id = %id, error = %e, "Failed to update order status");
            if is_htmx(&headers) {
                let previous = form
                    .previous
                    .as_deref()
                    .and_then(|raw| raw.parse().ok())
                    .unwrap_or_default();
                let mut cell = StatusCell::new(id, previous);
                cell.error = Some("Status update failed");
                Ok(OrderStatusTemplate { cell }.into_response())
            } else {
                Ok(Redirect::to("/admin/orders?notice=status_failed").into_response())
            }
        }
    }
}
