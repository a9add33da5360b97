//! Application error types

use std::collections::BTreeMap;

use thiserror::Error;
use tradepost_domain::{DomainError, ErrorBody, HttpMethod, StatusCode};

use crate::ports::{CredentialStoreError, HttpClientError};

/// Errors surfaced to callers of the authenticated client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] HttpClientError),

    /// The server answered with a non-2xx status.
    #[error("{method} {path} failed with {status}: {}", .body.summary())]
    Status {
        /// Request method.
        method: HttpMethod,
        /// Request path.
        path: String,
        /// Response status.
        status: StatusCode,
        /// Parsed response body.
        body: ErrorBody,
    },

    /// A 401 could not be recovered because the refresh call failed.
    ///
    /// Wraps the refresh call's own error, never the original 401.
    #[error("session expired: token refresh failed: {0}")]
    RefreshFailed(Box<ApiError>),

    /// The credential store could not be read or written.
    #[error("credential store error: {0}")]
    Store(#[from] CredentialStoreError),

    /// A 2xx body did not match the expected shape.
    #[error("unexpected response from {path}: {message}")]
    Decode {
        /// Request path.
        path: String,
        /// Deserializer message.
        message: String,
    },

    /// A request body could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The request was rejected before sending.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] DomainError),
}

impl ApiError {
    /// Status of the failed response, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RefreshFailed(inner) => inner.status(),
            _ => None,
        }
    }

    /// Returns true for a 401 that was not recovered.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status, .. } if status.is_unauthorized())
    }

    /// Returns true if the session was dropped because refresh failed.
    #[must_use]
    pub const fn is_refresh_failure(&self) -> bool {
        matches!(self, Self::RefreshFailed(_))
    }

    /// Field-level validation errors carried by a 4xx body.
    #[must_use]
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            Self::Status { body, .. } => body.field_errors(),
            _ => BTreeMap::new(),
        }
    }

    /// Message suitable for showing to the user.
    ///
    /// Prefers the backend's `detail`/`message`/`error` text and falls back
    /// to `default` for status errors without one.
    #[must_use]
    pub fn user_message(&self, default: &str) -> String {
        match self {
            Self::Status { body, .. } => body.message().unwrap_or_else(|| default.to_string()),
            Self::RefreshFailed(_) => "Your session has expired. Please log in again.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;
