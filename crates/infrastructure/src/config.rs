//! Client configuration.
//!
//! Settings come from environment variables with fixed fallbacks:
//!
//! | Variable | Default |
//! |---|---|
//! | `TRADEPOST_API_URL` | `http://127.0.0.1:8000` |
//! | `TRADEPOST_TIMEOUT_SECS` | `30` |
//! | `TRADEPOST_CREDENTIALS` | `<config dir>/tradepost/credentials.json` |
//! | `TRADEPOST_COALESCE_REFRESH` | `true` |

use std::path::PathBuf;
use std::time::Duration;

use tradepost_application::ClientOptions;
use url::Url;

/// Variable holding the API base URL.
pub const API_URL_VAR: &str = "TRADEPOST_API_URL";
/// Variable holding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "TRADEPOST_TIMEOUT_SECS";
/// Variable holding the credentials file path.
pub const CREDENTIALS_VAR: &str = "TRADEPOST_CREDENTIALS";
/// Variable toggling shared refresh calls.
pub const COALESCE_VAR: &str = "TRADEPOST_COALESCE_REFRESH";

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
/// Timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The base URL is not an absolute http(s) URL.
    #[error("invalid API URL {value:?}: {message}")]
    InvalidUrl {
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// A variable did not hold the expected kind of value.
    #[error("invalid value {value:?} for {var}: expected {expected}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
        /// Expected kind of value.
        expected: &'static str,
    },

    /// Could not determine config directory.
    #[error("could not determine config directory; set {CREDENTIALS_VAR}")]
    NoConfigDir,
}

/// Settings for the HTTP transport, the client and the credential file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Share one refresh call between concurrent 401s.
    pub coalesce_refresh: bool,
    /// Location of the credentials file.
    pub credentials_path: PathBuf,
}

impl ClientConfig {
    /// Creates a configuration with defaults and the given credentials file.
    #[must_use]
    pub fn new(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            coalesce_refresh: true,
            credentials_path: credentials_path.into(),
        }
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value, or if no
    /// credentials path is set and the platform has no config directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads the configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let credentials_path = match get(CREDENTIALS_VAR) {
            Some(path) => PathBuf::from(path),
            None => default_credentials_path().ok_or(ConfigError::NoConfigDir)?,
        };
        let mut config = Self::new(credentials_path);

        if let Some(url) = get(API_URL_VAR) {
            config = config.with_base_url(&url)?;
        }
        if let Some(secs) = get(TIMEOUT_VAR) {
            let secs: u64 = secs
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: TIMEOUT_VAR,
                    value: secs.clone(),
                    expected: "a positive number of seconds",
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = get(COALESCE_VAR) {
            config.coalesce_refresh = parse_flag(&flag).ok_or(ConfigError::InvalidValue {
                var: COALESCE_VAR,
                value: flag,
                expected: "true or false",
            })?;
        }

        Ok(config)
    }

    /// Replaces the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error unless `url` is an absolute http(s) URL.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidUrl {
            value: url.to_string(),
            message,
        };
        let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Replaces the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables shared refresh calls.
    #[must_use]
    pub const fn with_coalesce_refresh(mut self, coalesce: bool) -> Self {
        self.coalesce_refresh = coalesce;
        self
    }

    /// Options for the authenticated client.
    #[must_use]
    pub const fn client_options(&self) -> ClientOptions {
        ClientOptions {
            coalesce_refresh: self.coalesce_refresh,
        }
    }
}

/// Returns the default credentials file in the platform config directory:
/// - Linux: ~/.config/tradepost/credentials.json
/// - macOS: ~/Library/Application Support/tradepost/credentials.json
/// - Windows: %APPDATA%/tradepost/credentials.json
#[must_use]
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tradepost").join("credentials.json"))
}

fn default_user_agent() -> String {
    format!("tradepost/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config =
            ClientConfig::from_lookup(lookup(&[(CREDENTIALS_VAR, "/tmp/creds.json")])).unwrap();

        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.coalesce_refresh);
        assert_eq!(config.credentials_path, PathBuf::from("/tmp/creds.json"));
        assert!(config.user_agent.starts_with("tradepost/"));
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            (CREDENTIALS_VAR, "/tmp/creds.json"),
            (API_URL_VAR, "https://shop.example/"),
            (TIMEOUT_VAR, "5"),
            (COALESCE_VAR, "off"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://shop.example");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.client_options().coalesce_refresh);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = ClientConfig::from_lookup(lookup(&[
            (CREDENTIALS_VAR, "/tmp/creds.json"),
            (API_URL_VAR, "  "),
        ]))
        .unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[
            (CREDENTIALS_VAR, "/tmp/creds.json"),
            (TIMEOUT_VAR, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: TIMEOUT_VAR, .. }));

        let err = ClientConfig::from_lookup(lookup(&[
            (CREDENTIALS_VAR, "/tmp/creds.json"),
            (API_URL_VAR, "ftp://shop.example"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
