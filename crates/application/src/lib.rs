//! Tradepost Application - Authenticated client, ports and use cases
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the transport, credential store, clock)
//! - The authenticated client with transparent token refresh
//! - Use case orchestration for accounts, the catalog and the cart
//! - Application-level error handling

pub mod auth;
pub mod endpoints;
pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod test_support;

pub use auth::{
    AuthenticatedClient, BearerState, ClientOptions, InvalidationReason, MemoryCredentialStore,
    RequestPhase, SessionEvent, SessionEvents,
};
pub use error::{ApiError, ApiResult};
pub use ports::{Clock, CredentialStore, CredentialStoreError, HttpClientError, HttpTransport};
pub use use_cases::{
    Cart, CartView, Catalog, GetProfile, Login, LoginInput, Logout, Register, RestoreSession,
    SessionStatus, UpdateProfile,
};
