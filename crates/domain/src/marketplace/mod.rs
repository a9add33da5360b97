//! Marketplace resources: accounts, listings, cart and orders.

mod cart;
mod money;
mod page;
mod product;
mod user;

pub use cart::{AddToCart, CartItem, CartLine, Order, OrderItem, RemovedFromCart, cart_total};
pub use money::Money;
pub use page::Page;
pub use product::{
    Category, Condition, Product, ProductDetails, ProductDraft, ProductImage, ProductQuery,
    ProductSummary,
};
pub use user::{LoginForm, ProfileUpdate, RegistrationForm, RegistrationPayload, User};
