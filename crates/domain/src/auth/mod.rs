//! Authentication domain types

mod credentials;
mod token;

pub use credentials::{
    AuthResponse, CredentialKey, CredentialPair, RefreshRequest, RefreshResponse, bearer_value,
    token_preview,
};
pub use token::{TokenClaims, TokenStatus};
