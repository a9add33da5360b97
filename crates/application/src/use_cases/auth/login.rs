//! Login use case.

use std::sync::Arc;

use tradepost_domain::marketplace::LoginForm;
use tradepost_domain::{ApiRequest, AuthResponse, User};

use crate::auth::{AuthenticatedClient, SessionEvent};
use crate::endpoints;
use crate::error::ApiResult;
use crate::ports::{CredentialStore, HttpTransport};

/// Message shown when the backend rejects a login without explanation.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid credentials";

/// Input for logging in.
#[derive(Debug, Clone)]
pub struct LoginInput {
    /// Email or username.
    pub login: String,
    /// Plain password.
    pub password: String,
}

/// Use case for exchanging credentials for a session.
pub struct Login<T: HttpTransport, S: CredentialStore> {
    client: Arc<AuthenticatedClient<T, S>>,
}

impl<T: HttpTransport, S: CredentialStore> Login<T, S> {
    /// Creates a new `Login` use case.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient<T, S>>) -> Self {
        Self { client }
    }

    /// Logs in, persisting the issued token pair.
    ///
    /// The request carries no bearer, so a stale stored session never
    /// interferes and a rejected login never triggers a refresh.
    ///
    /// # Errors
    /// - Returns the backend rejection as a status error; use
    ///   `user_message(LOGIN_FAILED_MESSAGE)` to display it
    /// - Returns error if the tokens cannot be persisted
    pub async fn execute(&self, input: LoginInput) -> ApiResult<User> {
        let form = LoginForm {
            login: input.login,
            password: input.password,
        };
        let request = ApiRequest::post(endpoints::LOGIN).with_body(&form)?.anonymous();

        let (pair, user) = self.client.send_json::<AuthResponse>(request).await?.into_parts();
        self.client.establish_session(&pair).await?;

        tracing::info!(username = %user.username, "logged in");
        self.client.notify(SessionEvent::LoggedIn {
            username: user.username.clone(),
        });
        Ok(user)
    }
}
