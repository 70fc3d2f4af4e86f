//! Backend records mapped into what the templates show.
//!
//! Every list page runs its fetched records through a [`Presenter`] before
//! rendering. The presenter owns the two pieces of site configuration the
//! mapping needs: the currency symbol and the backend origin that relative
//! image paths hang off.

use chrono::{DateTime, NaiveDateTime, Utc};
use foodio_core::{CartLine, CategoryId, MenuItemId, OrderId, OrderStatus, Price};
use url::Url;

use crate::backend::{ApiCategory, ApiMenuItem, ApiOrder};

/// Shown for menu items without an image.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder-dish.svg";

/// Shown for menu items without a description.
pub const DEFAULT_DESCRIPTION: &str = "Delicious item from our menu";

/// Row of the back-office menu items table.
#[derive(Debug, Clone)]
pub struct MenuItemRow {
    pub id: MenuItemId,
    pub name: String,
    /// Category name, `N/A` when the item has none.
    pub category: String,
    pub category_id: Option<CategoryId>,
    /// Formatted price, e.g. `৳299.00`.
    pub price: String,
    /// Plain price for the edit form, e.g. `299` or `45.5`.
    pub raw_price: String,
    pub description: String,
    pub image: Option<String>,
    /// `Available` or `Unavailable`.
    pub status: &'static str,
    pub available: bool,
}

/// Card on the landing page and the customer menu.
#[derive(Debug, Clone)]
pub struct MenuCard {
    pub id: MenuItemId,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub category: Option<String>,
    pub available: bool,
}

/// Row of the back-office orders table.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: OrderId,
    /// e.g. `Dec 12, 2025`
    pub date: String,
    pub customer: String,
    pub total: String,
    pub status: OrderStatus,
}

/// An order in the customer's history.
#[derive(Debug, Clone)]
pub struct CustomerOrder {
    pub id: OrderId,
    /// e.g. `December 12, 2025`
    pub placed_date: String,
    /// e.g. `4:33 PM`
    pub placed_time: String,
    pub items: Vec<OrderLineView>,
    pub delivery_address: String,
    pub total: String,
    pub status: OrderStatus,
}

/// One line of an order in the customer's history.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub total: String,
}

/// One line of the cart page.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub item_id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub total: String,
}

/// The status select of one order row, also served alone to HTMX.
#[derive(Debug, Clone)]
pub struct StatusCell {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub error: Option<&'static str>,
}

/// One `<option>` of the status select.
#[derive(Debug, Clone, Copy)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl StatusCell {
    #[must_use]
    pub const fn new(order_id: OrderId, status: OrderStatus) -> Self {
        Self {
            order_id,
            status,
            error: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> Vec<StatusOption> {
        OrderStatus::ALL
            .iter()
            .map(|status| StatusOption {
                value: status.as_str(),
                label: status.label(),
                selected: *status == self.status,
            })
            .collect()
    }
}

impl OrderRow {
    #[must_use]
    pub const fn status_cell(&self) -> StatusCell {
        StatusCell::new(self.id, self.status)
    }
}

/// Maps backend records to display records.
#[derive(Debug, Clone)]
pub struct Presenter {
    currency_symbol: String,
    asset_base: Url,
}

impl Presenter {
    #[must_use]
    pub fn new(currency_symbol: impl Into<String>, asset_base: Url) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            asset_base,
        }
    }

    /// Format a price with the configured symbol.
    #[must_use]
    pub fn price(&self, price: Price) -> String {
        price.display(&self.currency_symbol)
    }

    /// Resolve an image path from the backend.
    ///
    /// Absolute URLs pass through, protocol-relative ones take the backend's
    /// scheme, and paths are joined onto the backend origin.
    #[must_use]
    pub fn image_url(&self, raw: Option<&str>) -> Option<String> {
        let raw = raw.map(str::trim).filter(|raw| !raw.is_empty())?;
        if raw.starts_with("http://") || raw.starts_with("https://") || raw.starts_with("data:") {
            return Some(raw.to_string());
        }
        if raw.starts_with("//") {
            return Some(format!("{}:{raw}", self.asset_base.scheme()));
        }
        let base = self.asset_base.as_str().trim_end_matches('/');
        let path = raw.trim_start_matches('/');
        Some(format!("{base}/{path}"))
    }

    #[must_use]
    pub fn menu_row(&self, item: ApiMenuItem) -> MenuItemRow {
        let image = self.image_url(item.image_url.as_deref());
        MenuItemRow {
            id: item.id,
            category: item
                .category
                .map_or_else(|| "N/A".to_string(), |category| category.name),
            category_id: item.category_id,
            price: self.price(item.price),
            raw_price: item.price.to_string(),
            description: item.description.unwrap_or_default(),
            image,
            status: if item.is_available {
                "Available"
            } else {
                "Unavailable"
            },
            available: item.is_available,
            name: item.name,
        }
    }

    #[must_use]
    pub fn menu_card(&self, item: ApiMenuItem) -> MenuCard {
        MenuCard {
            id: item.id,
            image: self
                .image_url(item.image_url.as_deref())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            description: item
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            price: self.price(item.price),
            category: item.category.map(|category| category.name),
            available: item.is_available,
            name: item.name,
        }
    }

    #[must_use]
    pub fn order_row(&self, order: ApiOrder) -> OrderRow {
        let status = order.status();
        let customer = order
            .user
            .as_ref()
            .and_then(|user| non_blank(user.name.as_deref()).or(non_blank(user.email.as_deref())))
            .unwrap_or("Unknown")
            .to_string();
        OrderRow {
            id: order.id,
            date: order
                .created_at
                .as_deref()
                .map(admin_date)
                .unwrap_or_default(),
            customer,
            total: self.price(order.total_price.unwrap_or(Price::ZERO)),
            status,
        }
    }

    #[must_use]
    pub fn customer_order(&self, order: ApiOrder) -> CustomerOrder {
        let status = order.status();
        let (placed_date, placed_time) = order
            .created_at
            .as_deref()
            .map(customer_date_time)
            .unwrap_or_default();

        let mut computed_total = Price::ZERO;
        let items = order
            .items
            .iter()
            .map(|line| {
                let unit = line
                    .price
                    .or_else(|| line.menu_item.as_ref().and_then(|item| item.price))
                    .unwrap_or(Price::ZERO);
                let total = unit * line.quantity;
                computed_total = computed_total + total;
                OrderLineView {
                    name: line
                        .menu_item
                        .as_ref()
                        .map_or_else(|| "Menu item".to_string(), |item| item.name.clone()),
                    quantity: line.quantity,
                    total: self.price(total),
                }
            })
            .collect();

        let delivery_address = non_blank(order.delivery_address.as_deref())
            .or_else(|| order.user.as_ref().and_then(|u| non_blank(u.address.as_deref())))
            .unwrap_or("Not provided")
            .to_string();

        CustomerOrder {
            id: order.id,
            placed_date,
            placed_time,
            items,
            delivery_address,
            total: self.price(order.total_price.unwrap_or(computed_total)),
            status,
        }
    }

    #[must_use]
    pub fn cart_line(&self, line: &CartLine) -> CartLineView {
        CartLineView {
            item_id: line.item_id,
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: self.price(line.unit_price),
            total: self.price(line.line_total()),
        }
    }
}

/// Category names in first-seen order, for the customer menu tabs.
#[must_use]
pub fn category_tabs(items: &[ApiMenuItem]) -> Vec<String> {
    let mut tabs: Vec<String> = Vec::new();
    for name in items
        .iter()
        .filter_map(|item| item.category.as_ref().map(|c: &ApiCategory| c.name.as_str()))
    {
        if !tabs.iter().any(|tab| tab.eq_ignore_ascii_case(name)) {
            tabs.push(name.to_string());
        }
    }
    tabs
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Timestamps are shown in UTC whatever offset the backend sent.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// `2025-12-12T16:33:00Z` → `Dec 12, 2025`. Unparseable input is shown as is.
#[must_use]
pub fn admin_date(raw: &str) -> String {
    parse_timestamp(raw).map_or_else(|| raw.to_string(), |ts| ts.format("%b %-d, %Y").to_string())
}

/// `2025-12-12T16:33:00Z` → (`December 12, 2025`, `4:33 PM`).
#[must_use]
pub fn customer_date_time(raw: &str) -> (String, String) {
    parse_timestamp(raw).map_or_else(
        || (raw.to_string(), String::new()),
        |ts| {
            (
                ts.format("%B %-d, %Y").to_string(),
                ts.format("%-I:%M %p").to_string(),
            )
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn presenter() -> Presenter {
        Presenter::new("৳", Url::parse("http://localhost:3000").unwrap())
    }

    fn item(json: &str) -> ApiMenuItem {
        serde_json::from_str(json).unwrap()
    }

    fn order(json: &str) -> ApiOrder {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_menu_row_transform() {
        let row = presenter().menu_row(item(
            r#"{"id":1,"name":"Cheese Burger","price":299,"category":{"id":2,"name":"Main"},"isAvailable":false}"#,
        ));
        assert_eq!(row.price, "৳299.00");
        assert_eq!(row.category, "Main");
        assert_eq!(row.status, "Unavailable");
        assert!(!row.available);
    }

    #[test]
    fn test_menu_row_without_category() {
        let row = presenter().menu_row(item(r#"{"id":1,"name":"Tea","price":"15.5"}"#));
        assert_eq!(row.category, "N/A");
        assert_eq!(row.price, "৳15.50");
        assert_eq!(row.status, "Available");
    }

    #[test]
    fn test_menu_card_defaults() {
        let card = presenter().menu_card(item(r#"{"id":1,"name":"Tea","price":15}"#));
        assert_eq!(card.description, DEFAULT_DESCRIPTION);
        assert_eq!(card.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_image_urls() {
        let p = presenter();
        assert_eq!(
            p.image_url(Some("/uploads/burger.png")).unwrap(),
            "http://localhost:3000/uploads/burger.png"
        );
        assert_eq!(
            p.image_url(Some("https://cdn.foodio.test/a.jpg")).unwrap(),
            "https://cdn.foodio.test/a.jpg"
        );
        assert_eq!(
            p.image_url(Some("//cdn.foodio.test/b.png")).unwrap(),
            "http://cdn.foodio.test/b.png"
        );
        assert_eq!(p.image_url(Some("  ")), None);
    }

    #[test]
    fn test_order_row_fallbacks() {
        let row = presenter().order_row(order(
            r#"{"id":12,"createdAt":"2025-12-12T16:33:00.000Z","user":{"email":"sam@foodio.test"}}"#,
        ));
        assert_eq!(row.date, "Dec 12, 2025");
        assert_eq!(row.customer, "sam@foodio.test");
        assert_eq!(row.total, "৳0.00");
        assert_eq!(row.status, OrderStatus::Pending);

        let row = presenter().order_row(order(r#"{"id":13,"user":{"name":"","email":null}}"#));
        assert_eq!(row.customer, "Unknown");
    }

    #[test]
    fn test_customer_order_dates_and_lines() {
        let view = presenter().customer_order(order(
            r#"{"id":5,"createdAt":"2025-12-12T16:33:00Z","status":"READY",
                "items":[{"quantity":2,"price":"150","menuItem":{"name":"Olive Medley"}}],
                "deliveryAddress":"House 23, Road 23"}"#,
        ));
        assert_eq!(view.placed_date, "December 12, 2025");
        assert_eq!(view.placed_time, "4:33 PM");
        assert_eq!(view.items[0].total, "৳300.00");
        assert_eq!(view.total, "৳300.00");
        assert_eq!(view.status, OrderStatus::Ready);
    }

    #[test]
    fn test_dates_render_in_utc() {
        assert_eq!(admin_date("2025-12-12T23:30:00-05:00"), "Dec 13, 2025");
        assert_eq!(
            customer_date_time("2025-12-13T02:15:00+06:00"),
            ("December 12, 2025".to_string(), "8:15 PM".to_string())
        );
    }

    #[test]
    fn test_unparseable_date_is_kept() {
        assert_eq!(admin_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_category_tabs_first_seen_order() {
        let items = vec![
            item(r#"{"id":1,"name":"A","price":1,"category":{"id":2,"name":"Starters"}}"#),
            item(r#"{"id":2,"name":"B","price":1,"category":{"id":1,"name":"Main"}}"#),
            item(r#"{"id":3,"name":"C","price":1,"category":{"id":2,"name":"Starters"}}"#),
            item(r#"{"id":4,"name":"D","price":1}"#),
        ];
        assert_eq!(category_tabs(&items), ["Starters", "Main"]);
    }

    #[test]
    fn test_status_cell_selects_current() {
        let row = presenter().order_row(order(r#"{"id":7,"status":"ready"}"#));
        let cell = row.status_cell();
        let selected: Vec<_> = cell
            .options()
            .into_iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, ["READY"]);
        assert!(cell.error.is_none());
    }
}
