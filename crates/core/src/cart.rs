//! The per-session cart.
//!
//! Lines are kept in the order they were first added. The cart lives in the
//! session until an order is placed, so it has to stay serde-friendly.

use serde::{Deserialize, Serialize};

use crate::types::{MenuItemId, Price};

/// Largest quantity a single line can hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// One menu item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: MenuItemId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// Items a customer intends to order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Lines in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add `quantity` units of an item, merging with an existing line.
    ///
    /// The name and price are refreshed from the latest menu data. A zero
    /// quantity is treated as one.
    pub fn add(&mut self, item_id: MenuItemId, name: String, unit_price: Price, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(line) = self.lines.iter_mut().find(|line| line.item_id == item_id) {
            line.quantity = line.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY);
            line.name = name;
            line.unit_price = unit_price;
        } else {
            self.lines.push(CartLine {
                item_id,
                name,
                unit_price,
                quantity: quantity.min(MAX_LINE_QUANTITY),
            });
        }
    }

    /// Set a line's quantity. Zero removes the line; unknown items are ignored.
    pub fn set_quantity(&mut self, item_id: MenuItemId, quantity: u32) {
        if quantity == 0 {
            self.remove(item_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|line| line.item_id == item_id) {
            line.quantity = quantity.min(MAX_LINE_QUANTITY);
        }
    }

    /// Drop a line.
    pub fn remove(&mut self, item_id: MenuItemId) {
        self.lines.retain(|line| line.item_id != item_id);
    }
}
