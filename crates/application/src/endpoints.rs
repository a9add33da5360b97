//! Backend endpoint paths.
//!
//! Paths are relative to the API base URL and must match the backend
//! routes exactly, trailing slash included.

/// `POST` credentials, answers with a token pair and the user.
pub const LOGIN: &str = "/api/auth/login/";
/// `POST` a new account, answers like [`LOGIN`].
pub const REGISTER: &str = "/api/auth/register/";
/// `GET` / `PATCH` the current user.
pub const PROFILE: &str = "/api/auth/profile/";
/// `POST` a refresh token, answers with a new access token.
pub const TOKEN_REFRESH: &str = "/api/auth/token/refresh/";

/// `GET` listings, filterable by `search`, `category` and `condition`.
pub const PRODUCTS: &str = "/api/products/";
/// `GET` all categories.
pub const CATEGORIES: &str = "/api/products/categories/";
/// `POST` a new listing.
pub const PRODUCT_CREATE: &str = "/api/products/create/";
/// `GET` the current user's listings.
pub const MY_PRODUCTS: &str = "/api/products/my-products/";

/// `GET` the current user's cart.
pub const CART: &str = "/api/cart/";
/// `POST` a product to the cart.
pub const CART_ADD: &str = "/api/cart/add/";
/// `POST` to turn the cart into an order.
pub const CHECKOUT: &str = "/api/cart/checkout/";
/// `GET` the current user's orders.
pub const ORDERS: &str = "/api/cart/orders/";

/// `GET` a single listing.
#[must_use]
pub fn product(id: i64) -> String {
    format!("/api/products/{id}/")
}

/// `DELETE` (or edit) a listing owned by the current user.
#[must_use]
pub fn product_edit(id: i64) -> String {
    format!("/api/products/{id}/edit/")
}

/// `DELETE` a cart line.
#[must_use]
pub fn cart_remove(item_id: i64) -> String {
    format!("/api/cart/remove/{item_id}/")
}
