//! Session lifecycle events.
//!
//! The authenticated client never navigates anywhere itself. When a session
//! starts, refreshes or ends it publishes a [`SessionEvent`]; hosts subscribe
//! and decide how to react (show a login prompt, exit, ...).

use tokio::sync::broadcast;
use tradepost_domain::auth::token_preview;

/// Capacity of the event channel. Slow subscribers lose the oldest events.
const EVENT_CAPACITY: usize = 16;

/// Why a session was dropped by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationReason {
    /// A request was rejected and no refresh token was stored.
    MissingRefreshToken,
    /// The refresh endpoint rejected the stored refresh token.
    RefreshRejected {
        /// Error returned by the refresh call.
        message: String,
    },
    /// The stored session could not be used to load the profile at startup.
    RestoreFailed {
        /// Error returned by the profile call.
        message: String,
    },
}

impl std::fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRefreshToken => f.write_str("no refresh token stored"),
            Self::RefreshRejected { message } => write!(f, "refresh rejected: {message}"),
            Self::RestoreFailed { message } => write!(f, "stored session unusable: {message}"),
        }
    }
}

/// Events emitted over a session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login or registration succeeded.
    LoggedIn {
        /// Username of the account.
        username: String,
    },
    /// A new access token was obtained.
    TokenRefreshed {
        /// Truncated token, safe for display.
        token_preview: String,
    },
    /// The user logged out.
    LoggedOut,
    /// Credentials were cleared because they can no longer be used.
    Invalidated {
        /// What went wrong.
        reason: InvalidationReason,
    },
}

impl SessionEvent {
    /// Builds a refresh event for `token` without exposing it.
    #[must_use]
    pub fn refreshed(token: &str) -> Self {
        Self::TokenRefreshed {
            token_preview: token_preview(token),
        }
    }

    /// Returns true if the host should ask the user to log in again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Invalidated { .. })
    }
}

/// Broadcast hub for [`SessionEvent`]s.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Creates a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Subscribes to events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn emit(&self, event: SessionEvent) {
        tracing::debug!(?event, "session event");
        let _ = self.sender.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}
