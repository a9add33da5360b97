//! Credential pair and its persisted representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::marketplace::User;

/// Keys under which credentials are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialKey {
    /// Short-lived bearer credential.
    AccessToken,
    /// Longer-lived credential used only to mint access tokens.
    RefreshToken,
}

impl CredentialKey {
    /// All keys, in the order they are written.
    pub const ALL: [Self; 2] = [Self::AccessToken, Self::RefreshToken];

    /// Storage key string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access and refresh token issued together on login or registration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Short-lived bearer credential.
    pub access_token: String,
    /// Credential exchanged for a new access token.
    pub refresh_token: String,
}

impl CredentialPair {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: CredentialKey) -> &str {
        match key {
            CredentialKey::AccessToken => &self.access_token,
            CredentialKey::RefreshToken => &self.refresh_token,
        }
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &token_preview(&self.access_token))
            .field("refresh_token", &token_preview(&self.refresh_token))
            .finish()
    }
}

/// Body returned by the login and registration endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// New access token.
    pub access: String,
    /// New refresh token.
    pub refresh: String,
    /// The authenticated user.
    pub user: User,
}

impl AuthResponse {
    /// Splits the response into credentials and user.
    #[must_use]
    pub fn into_parts(self) -> (CredentialPair, User) {
        (CredentialPair::new(self.access, self.refresh), self.user)
    }
}

/// Body sent to the token refresh endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    /// The refresh token.
    pub refresh: &'a str,
}

/// Body returned by the token refresh endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    /// The newly minted access token.
    pub access: String,
}

/// Formats the `Authorization` header value for a bearer token.
#[must_use]
pub fn bearer_value(token: &str) -> String {
    format!("Bearer {token}")
}

/// Get a preview of a token (first 8 chars + ...) safe to log.
#[must_use]
pub fn token_preview(token: &str) -> String {
    if token.len() > 12 {
        let head: String = token.chars().take(8).collect();
        format!("{head}...")
    } else {
        "***".to_string()
    }
}
