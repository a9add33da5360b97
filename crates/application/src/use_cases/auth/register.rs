//! Registration use case.

use std::sync::Arc;

use tradepost_domain::marketplace::RegistrationForm;
use tradepost_domain::{ApiRequest, AuthResponse, User};

use crate::auth::{AuthenticatedClient, SessionEvent};
use crate::endpoints;
use crate::error::ApiResult;
use crate::ports::{CredentialStore, HttpTransport};

/// Use case for creating an account and starting its session.
pub struct Register<T: HttpTransport, S: CredentialStore> {
    client: Arc<AuthenticatedClient<T, S>>,
}

impl<T: HttpTransport, S: CredentialStore> Register<T, S> {
    /// Creates a new `Register` use case.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient<T, S>>) -> Self {
        Self { client }
    }

    /// Registers the account and persists the issued token pair.
    ///
    /// The password confirmation defaults to the password.
    ///
    /// # Errors
    /// - Returns the validation failure; its `field_errors()` lists the
    ///   rejected fields
    /// - Returns error if the tokens cannot be persisted
    pub async fn execute(&self, form: RegistrationForm) -> ApiResult<User> {
        let request = ApiRequest::post(endpoints::REGISTER)
            .with_body(&form.into_payload())?
            .anonymous();

        let (pair, user) = self.client.send_json::<AuthResponse>(request).await?.into_parts();
        self.client.establish_session(&pair).await?;

        tracing::info!(username = %user.username, "registered");
        self.client.notify(SessionEvent::LoggedIn {
            username: user.username.clone(),
        });
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
    use tradepost_domain::HttpMethod;

    #[tokio::test]
    async fn validation_errors_are_exposed_per_field() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(MemoryCredentialStore::new());
        let client = Arc::new(AuthenticatedClient::new(transport.clone(), store.clone()));
        transport.reply(
            HttpMethod::Post,
            endpoints::REGISTER,
            400,
            json!({
                "email": ["user with this email already exists."],
                "username": ["A user with that username already exists."]
            }),
        );

        let err = Register::new(client)
            .execute(RegistrationForm {
                email: "ana@example.com".into(),
                username: "ana".into(),
                password: "s3cret-pass".into(),
                ..RegistrationForm::default()
            })
            .await
            .unwrap_err();

        let fields = err.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["email"], vec!["user with this email already exists."]);
        assert_eq!(
            transport.calls()[0].body.as_ref().unwrap()["password_confirm"],
            "s3cret-pass"
        );
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn successful_registration_starts_a_session() {
        let transport = Arc::new(ScriptedTransport::new());
        let store = Arc::new(MemoryCredentialStore::new());
        let client = Arc::new(AuthenticatedClient::new(transport.clone(), store.clone()));
        transport.reply(
            HttpMethod::Post,
            endpoints::REGISTER,
            201,
            json!({
                "access": "A1",
                "refresh": "R1",
                "user": {"id": 2, "email": "bo@example.com", "username": "bo"}
            }),
        );

        let user = Register::new(client)
            .execute(RegistrationForm {
                email: "bo@example.com".into(),
                username: "bo".into(),
                password: "pw".into(),
                ..RegistrationForm::default()
            })
            .await
            .unwrap();

        assert_eq!(user.id, 2);
        assert_eq!(store.count().await, 2);
    }
}
