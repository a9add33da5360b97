//! Session bootstrap on startup.

use std::sync::Arc;

use tradepost_domain::User;

use crate::auth::{AuthenticatedClient, InvalidationReason, SessionEvent};
use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::ports::{CredentialStore, HttpTransport};

/// Use case for resuming a stored session.
pub struct RestoreSession<T: HttpTransport, S: CredentialStore> {
    client: Arc<AuthenticatedClient<T, S>>,
}

impl<T: HttpTransport, S: CredentialStore> RestoreSession<T, S> {
    /// Creates a new `RestoreSession` use case.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient<T, S>>) -> Self {
        Self { client }
    }

    /// Loads the user for the stored session, if any.
    ///
    /// Returns `None` when no access token is stored, or when the backend
    /// rejects the stored session; the credentials are cleared in that case.
    ///
    /// # Errors
    /// Returns transport and store errors. Stored credentials are kept when
    /// the backend could not be reached.
    pub async fn execute(&self) -> ApiResult<Option<User>> {
        if self.client.current_bearer().await?.is_none() {
            return Ok(None);
        }

        match self.client.get::<User>(endpoints::PROFILE).await {
            Ok(user) => {
                tracing::info!(username = %user.username, "session restored");
                Ok(Some(user))
            }
            // Already cleared and announced by the client.
            Err(ApiError::RefreshFailed(_)) => Ok(None),
            Err(err) if err.is_unauthorized() && self.client.current_bearer().await?.is_none() => {
                tracing::debug!("stored session rejected without a refresh token");
                Ok(None)
            }
            Err(err @ (ApiError::Status { .. } | ApiError::Decode { .. })) => {
                tracing::warn!(error = %err, "stored session rejected, clearing credentials");
                self.client.end_session().await?;
                self.client.notify(SessionEvent::Invalidated {
                    reason: InvalidationReason::RestoreFailed {
                        message: err.to_string(),
                    },
                });
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
