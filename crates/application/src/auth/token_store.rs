//! In-memory credential storage.
//!
//! Backs tests and short-lived hosts that must not touch the disk.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tradepost_domain::{CredentialKey, CredentialPair};

use crate::ports::{CredentialStore, CredentialStoreError};

/// Thread-safe in-memory credential store.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    entries: Arc<RwLock<HashMap<CredentialKey, String>>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `pair`.
    #[must_use]
    pub fn with_pair(pair: &CredentialPair) -> Self {
        let entries = CredentialKey::ALL
            .into_iter()
            .map(|key| (key, pair.get(key).to_string()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Creates a store holding only an access token.
    #[must_use]
    pub fn with_access_token(token: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(CredentialKey::AccessToken, token.into());
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Get count of stored entries.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, CredentialStoreError> {
        Ok(self.entries.read().await.get(&key).cloned())
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), CredentialStoreError> {
        self.entries.write().await.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: CredentialKey) -> Result<(), CredentialStoreError> {
        self.entries.write().await.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn pair_round_trip_and_clear() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.load_pair().await.unwrap(), None);

        store
            .save_pair(&CredentialPair::new("A1", "R1"))
            .await
            .unwrap();
        assert_eq!(store.count().await, 2);
        assert_eq!(
            store.get(CredentialKey::RefreshToken).await.unwrap().as_deref(),
            Some("R1")
        );

        store.clear().await.unwrap();
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn load_pair_requires_both_tokens() {
        let store = MemoryCredentialStore::with_access_token("A1");
        assert_eq!(store.load_pair().await.unwrap(), None);
        assert_eq!(
            store.get(CredentialKey::AccessToken).await.unwrap().as_deref(),
            Some("A1")
        );
    }

    #[tokio::test]
    async fn removing_missing_key_is_ok() {
        let store = MemoryCredentialStore::new();
        assert!(store.remove(CredentialKey::AccessToken).await.is_ok());
    }
}
