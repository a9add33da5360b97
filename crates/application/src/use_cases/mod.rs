//! Application use cases (business logic orchestration).

mod auth;
mod cart;
mod catalog;

pub use auth::*;
pub use cart::*;
pub use catalog::*;
