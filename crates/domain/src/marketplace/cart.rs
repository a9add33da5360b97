//! Cart lines and orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Money, ProductSummary};

/// A line in the current user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Line identifier, used for removal.
    pub id: i64,
    /// The listing.
    pub product: ProductSummary,
    /// Units.
    pub quantity: u32,
    /// Line total as computed by the server.
    #[serde(default)]
    pub total_price: Option<Money>,
    /// When the line was added.
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

impl CartItem {
    /// Server line total, or unit price times quantity when absent.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.total_price
            .unwrap_or_else(|| self.product.price * self.quantity)
    }
}

/// Sum of all line totals.
#[must_use]
pub fn cart_total(items: &[CartItem]) -> Money {
    items.iter().map(CartItem::line_total).sum()
}

/// Body for adding a listing to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddToCart {
    /// Listing id.
    pub product: i64,
    /// Units to add; existing lines are incremented.
    pub quantity: u32,
}

impl AddToCart {
    /// Adds a single unit.
    #[must_use]
    pub const fn one(product: i64) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }
}

/// Line echoed back by the add-to-cart endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Listing id.
    pub product: i64,
    /// Units now in the cart line.
    pub quantity: u32,
}

/// A line of a placed order, with the price frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Identifier.
    pub id: i64,
    /// Listing id.
    pub product: i64,
    /// Listing title at checkout time.
    #[serde(default)]
    pub product_title: String,
    /// Units.
    pub quantity: u32,
    /// Unit price at checkout.
    pub price: Money,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Identifier.
    pub id: i64,
    /// Order total.
    pub total_amount: Money,
    /// Fulfilment status as reported by the server.
    #[serde(default)]
    pub status: String,
    /// Placement time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last status change.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Lines.
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Acknowledgement returned when a cart line is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemovedFromCart {
    /// Server message.
    #[serde(default)]
    pub message: Option<String>,
}
