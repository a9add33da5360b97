//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port using the reqwest
//! library. It resolves request paths against the configured API base URL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::{Client, Method, Url};
use tradepost_application::ports::{HttpClientError, HttpTransport};
use tradepost_domain::{ApiRequest, ApiResponse, HttpMethod};

use crate::config::ClientConfig;

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// HTTP transport implementation using reqwest.
///
/// Wraps `reqwest::Client` with a fixed base URL and timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be
    /// created.
    pub fn new(config: &ClientConfig) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Self::with_client(client, &config.base_url, config.timeout)
    }

    /// Creates a transport around an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn with_client(
        client: Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, HttpClientError> {
        Url::parse(base_url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {base_url}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Joins the request path and query onto the base URL.
    fn resolve(&self, request: &ApiRequest) -> Result<Url, HttpClientError> {
        let raw = format!("{}{}", self.base_url, request.path);
        let mut url =
            Url::parse(&raw).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {raw}")))?;

        if !request.query.is_empty() {
            let query = serde_urlencoded::to_string(&request.query)
                .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error.to_string();
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        HttpClientError::Other(error.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, HttpClientError> {
        let url = self.resolve(request)?;
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .header("Accept", "application/json");

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?
            .to_vec();

        let duration = start.elapsed();
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status,
            elapsed_ms = duration.as_millis(),
            "response received"
        );

        Ok(ApiResponse::new(status, headers, body, duration))
    }
}
