//! Backend request and response records.
//!
//! Responses are deserialized leniently: optional fields default, and
//! unknown fields are ignored, so a backend that adds columns never breaks a
//! page.

use foodio_core::{CategoryId, MenuItemId, OrderId, OrderStatus, Price, SessionUser};
use serde::{Deserialize, Serialize};

// =============================================================================
// Menu
// =============================================================================

/// Menu item as returned by `/admin/menu` and `/user/menu`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category: Option<ApiCategory>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

const fn default_available() -> bool {
    true
}

/// Menu category.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCategory {
    pub id: CategoryId,
    pub name: String,
}

/// Body of `POST /admin/categories`.
#[derive(Debug, Serialize)]
pub struct CreateCategoryRequest<'a> {
    pub name: &'a str,
}

/// An image forwarded to the backend as a multipart part.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Changes sent with an edit, beyond the validated form fields.
#[derive(Debug, Clone, Default)]
pub struct MenuItemUpdate {
    pub available: bool,
    pub image: Option<ImageUpload>,
    pub remove_image: bool,
}

// =============================================================================
// Orders
// =============================================================================

/// Order as returned by `/admin/orders` and `/user/orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrder {
    pub id: OrderId,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<ApiOrderCustomer>,
    #[serde(default)]
    pub total_price: Option<Price>,
    /// Raw status; unknown or missing values display as pending.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "orderItems")]
    pub items: Vec<ApiOrderLine>,
    #[serde(default)]
    pub delivery_address: Option<String>,
}

impl ApiOrder {
    /// Parsed status, `PENDING` when absent or unrecognised.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

/// The customer an order belongs to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiOrderCustomer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// One line of an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOrderLine {
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, alias = "unitPrice")]
    pub price: Option<Price>,
    #[serde(default)]
    pub menu_item: Option<ApiOrderLineItem>,
}

const fn default_quantity() -> u32 {
    1
}

/// Menu item reference nested in an order line.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiOrderLineItem {
    pub name: String,
    #[serde(default)]
    pub price: Option<Price>,
}

/// Body of `POST /user/placeorder`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub items: Vec<PlaceOrderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
}

/// One line of a new order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderLine {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

/// Body of `PATCH /admin/order/status/{id}`.
#[derive(Debug, Serialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful sign-in.
#[derive(Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    pub user: SessionUser,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Body of `POST /auth/register`.
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub address: &'a str,
    pub password: &'a str,
}
