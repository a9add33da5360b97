//! Logout use case.

use std::sync::Arc;

use crate::auth::{AuthenticatedClient, SessionEvent};
use crate::error::ApiResult;
use crate::ports::{CredentialStore, HttpTransport};

/// Use case for ending the current session.
///
/// Tokens are dropped locally; the backend keeps no session to close.
pub struct Logout<T: HttpTransport, S: CredentialStore> {
    client: Arc<AuthenticatedClient<T, S>>,
}

impl<T: HttpTransport, S: CredentialStore> Logout<T, S> {
    /// Creates a new `Logout` use case.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient<T, S>>) -> Self {
        Self { client }
    }

    /// Clears both tokens and the live bearer.
    ///
    /// # Errors
    /// Returns error if the credential store cannot be cleared.
    pub async fn execute(&self) -> ApiResult<()> {
        self.client.end_session().await?;
        tracing::info!("logged out");
        self.client.notify(SessionEvent::LoggedOut);
        Ok(())
    }
}
