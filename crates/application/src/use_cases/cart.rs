//! Cart and order use cases.

use std::sync::Arc;

use tradepost_domain::marketplace::{AddToCart, CartItem, CartLine, RemovedFromCart, cart_total};
use tradepost_domain::{Money, Order, Page};

use crate::auth::AuthenticatedClient;
use crate::endpoints;
use crate::error::ApiResult;
use crate::ports::{CredentialStore, HttpTransport};

/// The current user's cart with its client-side total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    /// Cart lines.
    pub items: Vec<CartItem>,
    /// Sum of the line totals.
    pub total: Money,
}

impl CartView {
    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart operations. All of them require a session.
pub struct Cart<T: HttpTransport, S: CredentialStore> {
    client: Arc<AuthenticatedClient<T, S>>,
}

impl<T: HttpTransport, S: CredentialStore> Cart<T, S> {
    /// Creates a new `Cart`.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient<T, S>>) -> Self {
        Self { client }
    }

    /// Loads the cart.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn view(&self) -> ApiResult<CartView> {
        let page: Page<CartItem> = self.client.get(endpoints::CART).await?;
        let items = page.into_items();
        let total = cart_total(&items);
        Ok(CartView { items, total })
    }

    /// Adds `quantity` units of a listing.
    ///
    /// # Errors
    /// Returns error if the listing is unknown or the request fails.
    pub async fn add(&self, product: i64, quantity: u32) -> ApiResult<CartLine> {
        let line: CartLine = self
            .client
            .post(endpoints::CART_ADD, &AddToCart { product, quantity })
            .await?;
        tracing::debug!(product, quantity = line.quantity, "added to cart");
        Ok(line)
    }

    /// Removes a cart line.
    ///
    /// # Errors
    /// Returns a 404 status error if the line does not exist.
    pub async fn remove(&self, item_id: i64) -> ApiResult<RemovedFromCart> {
        self.client.delete(endpoints::cart_remove(item_id)).await
    }

    /// Places an order for the whole cart.
    ///
    /// # Errors
    /// Returns a 400 status error if the cart is empty.
    pub async fn checkout(&self) -> ApiResult<Order> {
        let order: Order = self
            .client
            .post(endpoints::CHECKOUT, &serde_json::json!({}))
            .await?;
        tracing::info!(order = order.id, total = %order.total_amount, "order placed");
        Ok(order)
    }

    /// Lists the user's past orders.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn orders(&self) -> ApiResult<Vec<Order>> {
        let page: Page<Order> = self.client.get(endpoints::ORDERS).await?;
        Ok(page.into_items())
    }
}
