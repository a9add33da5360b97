//! API request type

use std::collections::BTreeMap;

use serde::Serialize;

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// Name of the header carrying the bearer credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// A request against the marketplace API.
///
/// Paths are relative to the configured base URL and always start with `/`.
/// The bearer credential is not stored here: it is attached at send
/// time by the authenticated client unless the caller overrides the
/// `Authorization` header explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the API base URL
    pub path: String,
    /// Query string pairs, in insertion order
    pub query: Vec<(String, String)>,
    /// Optional JSON body
    pub body: Option<serde_json::Value>,
    /// Header overrides supplied by the caller
    pub headers: BTreeMap<String, String>,
    /// When set, no bearer is attached and a 401 is never recovered.
    pub anonymous: bool,
}

impl ApiRequest {
    /// Creates a request with the given method and path.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: BTreeMap::new(),
            anonymous: false,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` into the request's JSON body.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `body` cannot be represented as JSON.
    pub fn with_body<T: Serialize>(self, body: &T) -> Result<Self, serde_json::Error> {
        Ok(self.with_json(serde_json::to_value(body)?))
    }

    /// Adds a header override.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Marks the request as not carrying credentials.
    #[must_use]
    pub const fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    /// Looks up a header override by name, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns true if the caller supplied its own `Authorization` header.
    #[must_use]
    pub fn overrides_authorization(&self) -> bool {
        self.header(AUTHORIZATION_HEADER).is_some()
    }

    /// Replaces any `Authorization` override with the given value.
    pub fn set_authorization(&mut self, value: String) {
        self.headers
            .retain(|key, _| !key.eq_ignore_ascii_case(AUTHORIZATION_HEADER));
        self.headers.insert(AUTHORIZATION_HEADER.to_string(), value);
    }

    /// Checks that the path is relative to the API root.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPath`] for empty, absolute-URL or
    /// non-rooted paths.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.path.starts_with('/') || self.path.contains("://") {
            return Err(DomainError::InvalidPath(self.path.clone()));
        }
        Ok(())
    }
}
