//! HTTP transport port

use std::future::Future;

use tradepost_domain::{ApiRequest, ApiResponse};

/// Transport-level failures: the request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpClientError {
    /// The request timed out.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Host name could not be resolved.
    #[error("could not resolve {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Connection failed for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server kept redirecting.
    #[error("stopped after {max} redirects")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The base URL or path did not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for sending API requests.
///
/// Implementations resolve the request path against their base URL and
/// return every response they receive, successful or not. Only failures
/// to obtain a response are errors.
pub trait HttpTransport: Send + Sync {
    /// Sends a request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received: network issues,
    /// timeout, or an unusable URL.
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, HttpClientError>> + Send;
}
