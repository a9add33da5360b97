//! Session status for display.

use std::sync::Arc;

use tradepost_domain::{CredentialKey, TokenStatus};

use crate::ports::{Clock, CredentialStore, CredentialStoreError};

/// Use case for reporting the stored session's state without any request.
pub struct SessionStatus<S: CredentialStore, C: Clock> {
    store: Arc<S>,
    clock: C,
}

impl<S: CredentialStore, C: Clock> SessionStatus<S, C> {
    /// Creates a new `SessionStatus` use case.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Evaluates the stored tokens against the current time.
    ///
    /// # Errors
    /// Returns error if the store cannot be read.
    pub async fn execute(&self) -> Result<TokenStatus, CredentialStoreError> {
        let access = self.store.get(CredentialKey::AccessToken).await?;
        let refresh = self.store.get(CredentialKey::RefreshToken).await?;
        Ok(TokenStatus::evaluate(
            access.as_deref(),
            refresh.as_deref(),
            self.clock.now(),
        ))
    }
}
