//! Authenticated API client.
//!
//! Attaches the live bearer token to every request and recovers from an
//! expired access token by exchanging the stored refresh token once, then
//! replaying the failed request with the new token.
//!
//! # Per-request lifecycle
//!
//! ```text
//! Initial -> Sent -> Success | FailedOther | FailedUnauthorized
//! FailedUnauthorized -> Refreshing -> ReplayedSuccess | ReplayedFailed | RefreshFailed
//! ```
//!
//! A request is replayed at most once. A replay that fails, with a 401 or
//! anything else, is returned to the caller as is.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, broadcast};
use tradepost_domain::auth::{RefreshRequest, RefreshResponse, bearer_value, token_preview};
use tradepost_domain::{ApiRequest, ApiResponse, CredentialKey, CredentialPair, ErrorBody};

use super::bearer::BearerState;
use super::session::{InvalidationReason, SessionEvent, SessionEvents};
use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::ports::{CredentialStore, HttpTransport};

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = endpoints::TOKEN_REFRESH;

/// Tunables for [`AuthenticatedClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Share one refresh call between requests that hit a 401 concurrently.
    ///
    /// When disabled every failing request refreshes on its own.
    pub coalesce_refresh: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            coalesce_refresh: true,
        }
    }
}

/// Where a request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    /// Not sent yet.
    #[default]
    Initial,
    /// Waiting for the response.
    Sent,
    /// Answered with 2xx on the first attempt.
    Success,
    /// Failed with anything but a recoverable 401.
    FailedOther,
    /// First attempt answered 401.
    FailedUnauthorized,
    /// Obtaining a new access token.
    Refreshing,
    /// Replay answered with 2xx.
    ReplayedSuccess,
    /// Replay failed.
    ReplayedFailed,
    /// No new access token could be obtained.
    RefreshFailed,
}

impl RequestPhase {
    /// Returns true for phases that end the request.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Success
                | Self::FailedOther
                | Self::ReplayedSuccess
                | Self::ReplayedFailed
                | Self::RefreshFailed
        )
    }

    /// Returns true for phases that hand a response to the caller.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::ReplayedSuccess)
    }

    /// Phase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Sent => "sent",
            Self::Success => "success",
            Self::FailedOther => "failed_other",
            Self::FailedUnauthorized => "failed_401_first",
            Self::Refreshing => "refreshing",
            Self::ReplayedSuccess => "replayed_success",
            Self::ReplayedFailed => "replayed_failed",
            Self::RefreshFailed => "refresh_failed",
        }
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state carried by one call to [`AuthenticatedClient::request`].
#[derive(Debug, Default)]
struct RequestContext {
    retried: bool,
    phase: RequestPhase,
}

impl RequestContext {
    fn advance(&mut self, request: &ApiRequest, phase: RequestPhase) {
        tracing::trace!(
            method = %request.method,
            path = %request.path,
            from = %self.phase,
            to = %phase,
            "request phase"
        );
        self.phase = phase;
    }

    const fn failure_phase(&self, unauthorized: bool) -> RequestPhase {
        if self.retried {
            RequestPhase::ReplayedFailed
        } else if unauthorized {
            RequestPhase::FailedUnauthorized
        } else {
            RequestPhase::FailedOther
        }
    }
}

/// HTTP client that manages the bearer credential for its caller.
///
/// Cheap to share behind an `Arc`; all state is internally synchronized.
pub struct AuthenticatedClient<T: HttpTransport, S: CredentialStore> {
    transport: Arc<T>,
    store: Arc<S>,
    bearer: BearerState,
    events: SessionEvents,
    refresh_gate: Option<Mutex<()>>,
}

impl<T: HttpTransport, S: CredentialStore> AuthenticatedClient<T, S> {
    /// Creates a client with default options.
    pub fn new(transport: Arc<T>, store: Arc<S>) -> Self {
        Self::with_options(transport, store, ClientOptions::default())
    }

    /// Creates a client with the given options.
    pub fn with_options(transport: Arc<T>, store: Arc<S>, options: ClientOptions) -> Self {
        Self {
            transport,
            store,
            bearer: BearerState::new(),
            events: SessionEvents::new(),
            refresh_gate: options.coalesce_refresh.then(|| Mutex::new(())),
        }
    }

    /// The credential store backing this client.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Publishes a session event to subscribers.
    pub fn notify(&self, event: SessionEvent) {
        self.events.emit(event);
    }

    /// Token attached to the next request, if any.
    ///
    /// Falls back to the stored access token when no live token is set and
    /// adopts it as the live token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] if the store cannot be read.
    pub async fn current_bearer(&self) -> ApiResult<Option<String>> {
        if let Some(token) = self.bearer.get().await {
            return Ok(Some(token));
        }
        let stored = self.store.get(CredentialKey::AccessToken).await?;
        if let Some(token) = &stored {
            self.bearer.set(token.clone()).await;
        }
        Ok(stored)
    }

    /// Persists a freshly issued pair and makes its access token live.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] if the pair cannot be persisted.
    pub async fn establish_session(&self, pair: &CredentialPair) -> ApiResult<()> {
        self.store.save_pair(pair).await?;
        self.bearer.set(pair.access_token.clone()).await;
        Ok(())
    }

    /// Drops both stored tokens and the live token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Store`] if the store cannot be cleared. The live
    /// token is dropped regardless.
    pub async fn end_session(&self) -> ApiResult<()> {
        self.bearer.clear().await;
        self.store.clear().await?;
        Ok(())
    }

    /// Sends a request, refreshing the access token once on a 401.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] if no response was received
    /// - [`ApiError::Status`] for non-2xx responses, including a 401 that
    ///   could not be refreshed because no refresh token was stored
    /// - [`ApiError::RefreshFailed`] if the refresh call itself failed; the
    ///   stored credentials are cleared in that case
    pub async fn request(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.request_traced(request).await.0
    }

    /// Like [`request`](Self::request), also returning the phase the
    /// request ended in.
    pub async fn request_traced(
        &self,
        request: ApiRequest,
    ) -> (ApiResult<ApiResponse>, RequestPhase) {
        let mut ctx = RequestContext::default();
        let result = self.run(&request, &mut ctx).await;
        (result, ctx.phase)
    }

    async fn run(&self, request: &ApiRequest, ctx: &mut RequestContext) -> ApiResult<ApiResponse> {
        if let Err(err) = request.validate() {
            ctx.advance(request, RequestPhase::FailedOther);
            return Err(err.into());
        }

        let sent_with = if request.anonymous || request.overrides_authorization() {
            None
        } else {
            self.current_bearer().await?
        };

        match self.send(request, sent_with.as_deref(), ctx).await {
            Err(err) if err.is_unauthorized() && !request.anonymous && !ctx.retried => {
                ctx.retried = true;
                ctx.advance(request, RequestPhase::Refreshing);
                tracing::info!(path = %request.path, "access token rejected, refreshing");

                let token = match self.recover(sent_with.as_deref(), err).await {
                    Ok(token) => token,
                    Err(err) => {
                        ctx.advance(request, RequestPhase::RefreshFailed);
                        return Err(err);
                    }
                };
                self.send(request, Some(&token), ctx).await
            }
            other => other,
        }
    }

    /// Sends one attempt. `token` overrides any caller `Authorization`.
    async fn send(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
        ctx: &mut RequestContext,
    ) -> ApiResult<ApiResponse> {
        let mut outgoing = request.clone();
        if let Some(token) = token {
            outgoing.set_authorization(bearer_value(token));
        }

        ctx.advance(request, RequestPhase::Sent);
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            retried = ctx.retried,
            "sending request"
        );

        let response = match self.transport.execute(&outgoing).await {
            Ok(response) => response,
            Err(err) => {
                let phase = ctx.failure_phase(false);
                ctx.advance(request, phase);
                return Err(err.into());
            }
        };

        if response.is_success() {
            let phase = if ctx.retried {
                RequestPhase::ReplayedSuccess
            } else {
                RequestPhase::Success
            };
            ctx.advance(request, phase);
            return Ok(response);
        }

        let unauthorized = response.status.is_unauthorized() && !request.anonymous;
        let phase = ctx.failure_phase(unauthorized);
        ctx.advance(request, phase);
        Err(status_error(request, &response))
    }

    /// Obtains a new access token after `original` came back 401.
    ///
    /// `sent_with` is the token the failed request carried.
    async fn recover(&self, sent_with: Option<&str>, original: ApiError) -> ApiResult<String> {
        let _gate = match &self.refresh_gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };

        // Another request refreshed while this one waited for the gate.
        if self.refresh_gate.is_some()
            && let (Some(sent), Some(current)) = (sent_with, self.bearer.get().await)
            && sent != current
        {
            tracing::debug!(
                token = %token_preview(&current),
                "reusing token refreshed by a concurrent request"
            );
            return Ok(current);
        }

        let Some(refresh) = self.store.get(CredentialKey::RefreshToken).await? else {
            tracing::warn!("no refresh token stored, dropping access token");
            self.forget(&[CredentialKey::AccessToken]).await;
            self.bearer.clear().await;
            self.events.emit(SessionEvent::Invalidated {
                reason: InvalidationReason::MissingRefreshToken,
            });
            return Err(original);
        };

        match self.exchange_refresh(&refresh).await {
            Ok(access) => {
                if let Err(err) = self.store.set(CredentialKey::AccessToken, &access).await {
                    tracing::error!(error = %err, "failed to persist refreshed access token");
                }
                self.bearer.set(access.clone()).await;
                tracing::info!(token = %token_preview(&access), "access token refreshed");
                self.events.emit(SessionEvent::refreshed(&access));
                Ok(access)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, clearing session");
                self.forget(&CredentialKey::ALL).await;
                self.bearer.clear().await;
                self.events.emit(SessionEvent::Invalidated {
                    reason: InvalidationReason::RefreshRejected {
                        message: err.to_string(),
                    },
                });
                Err(ApiError::RefreshFailed(Box::new(err)))
            }
        }
    }

    async fn exchange_refresh(&self, refresh: &str) -> ApiResult<String> {
        let request = ApiRequest::post(REFRESH_PATH)
            .with_body(&RefreshRequest { refresh })?
            .anonymous();

        let response = self.transport.execute(&request).await?;
        if !response.is_success() {
            return Err(status_error(&request, &response));
        }
        let body: RefreshResponse = decode(&request.path, &response)?;
        Ok(body.access)
    }

    /// Removes stored entries, logging failures.
    async fn forget(&self, keys: &[CredentialKey]) {
        for key in keys {
            if let Err(err) = self.store.remove(*key).await {
                tracing::error!(key = %key, error = %err, "failed to remove stored credential");
            }
        }
    }

    /// Sends a request and decodes the 2xx body.
    ///
    /// # Errors
    ///
    /// Everything [`request`](Self::request) returns, plus
    /// [`ApiError::Decode`] if the body does not match `R`.
    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<R> {
        let path = request.path.clone();
        let response = self.request(request).await?;
        decode(&path, &response)
    }

    /// `GET` and decode.
    ///
    /// # Errors
    ///
    /// See [`send_json`](Self::send_json).
    pub async fn get<R: DeserializeOwned>(&self, path: impl Into<String>) -> ApiResult<R> {
        self.send_json(ApiRequest::get(path)).await
    }

    /// `POST` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`send_json`](Self::send_json).
    pub async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> ApiResult<R> {
        self.send_json(ApiRequest::post(path).with_body(body)?).await
    }

    /// `PATCH` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// See [`send_json`](Self::send_json).
    pub async fn patch<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> ApiResult<R> {
        self.send_json(ApiRequest::patch(path).with_body(body)?).await
    }

    /// `DELETE` and decode; an empty body decodes into `()`.
    ///
    /// # Errors
    ///
    /// See [`send_json`](Self::send_json).
    pub async fn delete<R: DeserializeOwned>(&self, path: impl Into<String>) -> ApiResult<R> {
        self.send_json(ApiRequest::delete(path)).await
    }
}

fn status_error(request: &ApiRequest, response: &ApiResponse) -> ApiError {
    ApiError::Status {
        method: request.method,
        path: request.path.clone(),
        status: response.status,
        body: ErrorBody::parse(&response.body),
    }
}

fn decode<R: DeserializeOwned>(path: &str, response: &ApiResponse) -> ApiResult<R> {
    response.json_body().map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
