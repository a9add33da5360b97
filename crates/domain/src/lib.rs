//! Tradepost Domain - Core marketplace types
//!
//! This crate defines the domain model for the Tradepost client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod marketplace;
pub mod request;
pub mod response;

pub use auth::{AuthResponse, CredentialKey, CredentialPair, TokenClaims, TokenStatus};
pub use error::{DomainError, DomainResult};
pub use marketplace::{
    Category, Condition, Money, Order, Page, Product, ProductDraft, ProductQuery, ProductSummary,
    User,
};
pub use request::{ApiRequest, HttpMethod};
pub use response::{ApiResponse, ErrorBody, StatusCode};
