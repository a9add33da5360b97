//! Response specification type
//!
//! Contains types for representing API responses: status codes,
//! headers, raw body and timing information.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 200 OK
    pub const OK: Self = Self(200);
    /// 201 Created
    pub const CREATED: Self = Self(201);
    /// 204 No Content
    pub const NO_CONTENT: Self = Self(204);
    /// 400 Bad Request
    pub const BAD_REQUEST: Self = Self(400);
    /// 401 Unauthorized
    pub const UNAUTHORIZED: Self = Self(401);
    /// 404 Not Found
    pub const NOT_FOUND: Self = Self(404);

    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is a 4xx client error status.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a 5xx server error status.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    /// Returns true for 401, the only status the client tries to recover.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.0 == 401
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Raw API response as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers, lower-cased names.
    pub headers: HashMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
    /// Time between send and full body receipt.
    pub duration: Duration,
}

impl ApiResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        Self {
            status: status.into(),
            headers,
            body,
            duration,
        }
    }

    /// Creates a response with a JSON body and no headers.
    #[must_use]
    pub fn json(status: impl Into<StatusCode>, body: &serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Self::new(status, headers, body.to_string().into_bytes(), Duration::ZERO)
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserializes the body as JSON.
    ///
    /// An empty body is treated as JSON `null`, so endpoints answering
    /// `204 No Content` can be decoded into `()` or `Option<T>`.
    ///
    /// # Errors
    ///
    /// Returns the deserializer error if the body does not match `T`.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_str("null");
        }
        serde_json::from_slice(&self.body)
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_code_categories() {
        assert!(StatusCode::OK.is_success());
        assert!(StatusCode::UNAUTHORIZED.is_client_error());
        assert!(StatusCode::UNAUTHORIZED.is_unauthorized());
        assert!(!StatusCode::new(403).is_unauthorized());
        assert!(StatusCode::new(502).is_server_error());
    }

    #[test]
    fn status_code_display() {
        assert_eq!(StatusCode::NOT_FOUND.to_string(), "404 Not Found");
        assert_eq!(StatusCode::new(418).to_string(), "418 Unknown");
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let response = ApiResponse::new(204, HashMap::new(), Vec::new(), Duration::ZERO);
        let decoded: Option<serde_json::Value> = response.json_body().unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn json_response_exposes_body_and_header() {
        let response = ApiResponse::json(200, &serde_json::json!({"access": "A2"}));
        let body: serde_json::Value = response.json_body().unwrap();

        assert_eq!(body["access"], "A2");
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }
}
