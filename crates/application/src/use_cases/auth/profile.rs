//! Profile use cases.

use std::sync::Arc;

use tradepost_domain::User;
use tradepost_domain::marketplace::ProfileUpdate;

use crate::auth::AuthenticatedClient;
use crate::endpoints;
use crate::error::ApiResult;
use crate::ports::{CredentialStore, HttpTransport};

/// Use case for loading the current user.
pub struct GetProfile<T: HttpTransport, S: CredentialStore> {
    client: Arc<AuthenticatedClient<T, S>>,
}

impl<T: HttpTransport, S: CredentialStore> GetProfile<T, S> {
    /// Creates a new `GetProfile` use case.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient<T, S>>) -> Self {
        Self { client }
    }

    /// Fetches the authenticated user.
    ///
    /// # Errors
    /// Returns error if the request fails or the session cannot be refreshed.
    pub async fn execute(&self) -> ApiResult<User> {
        self.client.get(endpoints::PROFILE).await
    }
}

/// Use case for editing the current user's contact details.
pub struct UpdateProfile<T: HttpTransport, S: CredentialStore> {
    client: Arc<AuthenticatedClient<T, S>>,
}

impl<T: HttpTransport, S: CredentialStore> UpdateProfile<T, S> {
    /// Creates a new `UpdateProfile` use case.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient<T, S>>) -> Self {
        Self { client }
    }

    /// Applies a partial update and returns the stored user.
    ///
    /// An empty update sends nothing and returns the current profile.
    ///
    /// # Errors
    /// Returns error if the request fails or a field is rejected.
    pub async fn execute(&self, update: ProfileUpdate) -> ApiResult<User> {
        if update.is_empty() {
            return self.client.get(endpoints::PROFILE).await;
        }
        let user: User = self.client.patch(endpoints::PROFILE, &update).await?;
        tracing::info!(username = %user.username, "profile updated");
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::MemoryCredentialStore;
    use crate::test_support::ScriptedTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tradepost_domain::{CredentialPair, HttpMethod};

    fn client(
        transport: &Arc<ScriptedTransport>,
    ) -> Arc<AuthenticatedClient<ScriptedTransport, MemoryCredentialStore>> {
        Arc::new(AuthenticatedClient::new(
            transport.clone(),
            Arc::new(MemoryCredentialStore::with_pair(&CredentialPair::new("A1", "R1"))),
        ))
    }

    #[tokio::test]
    async fn patches_only_set_fields() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(
            HttpMethod::Patch,
            endpoints::PROFILE,
            200,
            json!({"id": 1, "email": "ana@example.com", "username": "ana", "phone": "600"}),
        );

        let user = UpdateProfile::new(client(&transport))
            .execute(ProfileUpdate {
                phone: Some("600".into()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap();

        assert_eq!(user.phone.as_deref(), Some("600"));
        let sent = &transport.calls()[0];
        assert_eq!(sent.method, HttpMethod::Patch);
        assert_eq!(sent.body, Some(json!({"phone": "600"})));
    }

    #[tokio::test]
    async fn empty_update_only_reads() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(
            HttpMethod::Get,
            endpoints::PROFILE,
            200,
            json!({"id": 1, "email": "ana@example.com", "username": "ana"}),
        );

        UpdateProfile::new(client(&transport))
            .execute(ProfileUpdate::default())
            .await
            .unwrap();

        assert_eq!(transport.calls()[0].method, HttpMethod::Get);
    }
}
