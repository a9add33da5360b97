//! Live bearer credential shared by every request of a client.

use std::sync::Arc;

use tokio::sync::RwLock;

/// The access token attached to outgoing requests.
///
/// Cloning shares the same slot, so a refresh performed through one handle
/// is seen by every request sent afterwards.
#[derive(Debug, Clone, Default)]
pub struct BearerState {
    token: Arc<RwLock<Option<String>>>,
}

impl BearerState {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current token.
    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Replaces the current token.
    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Removes the current token.
    pub async fn clear(&self) {
        *self.token.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn clones_share_the_slot() {
        let bearer = BearerState::new();
        let handle = bearer.clone();

        bearer.set("A2").await;
        assert_eq!(handle.get().await.as_deref(), Some("A2"));

        handle.clear().await;
        assert_eq!(bearer.get().await, None);
    }
}
