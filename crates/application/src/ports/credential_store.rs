//! Credential store port
//!
//! Defines the interface for the durable key-value store holding the
//! access and refresh tokens.

use async_trait::async_trait;
use tradepost_domain::{CredentialKey, CredentialPair};

/// Errors that can occur during credential persistence.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Durable store for the credential pair.
///
/// Absence of an entry means "not authenticated". Writes must survive a
/// process restart.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Reads a single value.
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, CredentialStoreError>;

    /// Writes a single value.
    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialStoreError>;

    /// Removes a single value. Removing a missing key is not an error.
    async fn remove(&self, key: CredentialKey) -> Result<(), CredentialStoreError>;

    /// Writes both tokens.
    async fn save_pair(&self, pair: &CredentialPair) -> Result<(), CredentialStoreError> {
        for key in CredentialKey::ALL {
            self.set(key, pair.get(key)).await?;
        }
        Ok(())
    }

    /// Reads both tokens; `None` unless both are present.
    async fn load_pair(&self) -> Result<Option<CredentialPair>, CredentialStoreError> {
        let access = self.get(CredentialKey::AccessToken).await?;
        let refresh = self.get(CredentialKey::RefreshToken).await?;
        Ok(access
            .zip(refresh)
            .map(|(access, refresh)| CredentialPair::new(access, refresh)))
    }

    /// Removes both tokens.
    async fn clear(&self) -> Result<(), CredentialStoreError> {
        for key in CredentialKey::ALL {
            self.remove(key).await?;
        }
        Ok(())
    }
}
