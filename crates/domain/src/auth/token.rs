//! Access token inspection.
//!
//! The backend issues JWTs. The client never validates signatures; it only
//! reads the `exp` claim to report session status to the user.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{DomainError, DomainResult};

/// Claims the client cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Expiry as a Unix timestamp.
    #[serde(default)]
    pub exp: Option<i64>,
    /// Token type claim (`access` / `refresh`).
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenClaims {
    /// Decodes the payload segment of a JWT without verifying it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedToken`] if the token does not have
    /// three segments or the payload is not base64url-encoded JSON.
    pub fn decode(token: &str) -> DomainResult<Self> {
        let mut segments = token.split('.');
        let (Some(_), Some(payload), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(DomainError::MalformedToken("expected three segments".into()));
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| DomainError::MalformedToken(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| DomainError::MalformedToken(e.to_string()))
    }

    /// Expiry instant, if the token carries one.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// Status of the stored session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No access token is stored.
    NotAuthenticated,
    /// Access token is present and not yet expired.
    Valid {
        /// Seconds until expiry, or None if unknown.
        seconds_remaining: Option<i64>,
        /// Whether a refresh token is stored.
        can_refresh: bool,
    },
    /// Access token has expired.
    Expired {
        /// Whether the next 401 can be recovered by a refresh.
        can_refresh: bool,
    },
}

impl TokenStatus {
    /// Derives the status from the stored tokens at instant `now`.
    ///
    /// Tokens that are not JWTs are reported as valid with unknown expiry;
    /// the server stays the authority on whether they are accepted.
    #[must_use]
    pub fn evaluate(access: Option<&str>, refresh: Option<&str>, now: DateTime<Utc>) -> Self {
        let can_refresh = refresh.is_some();
        let Some(access) = access else {
            return Self::NotAuthenticated;
        };

        let expires_at = TokenClaims::decode(access)
            .ok()
            .and_then(|claims| claims.expires_at());

        match expires_at {
            Some(at) if at <= now => Self::Expired { can_refresh },
            Some(at) => Self::Valid {
                seconds_remaining: Some((at - now).num_seconds()),
                can_refresh,
            },
            None => Self::Valid {
                seconds_remaining: None,
                can_refresh,
            },
        }
    }

    /// Returns true if an access token is stored, expired or not.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::NotAuthenticated)
    }

    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not authenticated".to_string(),
            Self::Valid {
                seconds_remaining: Some(secs),
                ..
            } => {
                if *secs > 3600 {
                    format!("Valid for {} hours", secs / 3600)
                } else if *secs > 60 {
                    format!("Valid for {} minutes", secs / 60)
                } else {
                    format!("Valid for {secs} seconds")
                }
            }
            Self::Valid {
                seconds_remaining: None,
                ..
            } => "Valid (expiry unknown)".to_string(),
            Self::Expired { can_refresh: true } => {
                "Expired (will refresh on next request)".to_string()
            }
            Self::Expired { can_refresh: false } => "Expired".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn jwt_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn decodes_exp_claim() {
        let token =
            jwt_with_payload(&serde_json::json!({"exp": 1_700_000_000, "token_type": "access"}));
        let claims = TokenClaims::decode(&token).unwrap();

        assert_eq!(claims.exp, Some(1_700_000_000));
        assert_eq!(claims.token_type.as_deref(), Some("access"));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn rejects_opaque_tokens() {
        assert!(TokenClaims::decode("A1").is_err());
        assert!(TokenClaims::decode("a.%%%.c").is_err());
    }

    #[test]
    fn status_reflects_expiry() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let live = jwt_with_payload(&serde_json::json!({"exp": 1_700_000_600}));
        let dead = jwt_with_payload(&serde_json::json!({"exp": 1_699_999_000}));

        assert_eq!(
            TokenStatus::evaluate(Some(&live), Some("R1"), now),
            TokenStatus::Valid {
                seconds_remaining: Some(600),
                can_refresh: true
            }
        );
        assert_eq!(
            TokenStatus::evaluate(Some(&dead), None, now),
            TokenStatus::Expired { can_refresh: false }
        );
        assert_eq!(
            TokenStatus::evaluate(None, Some("R1"), now),
            TokenStatus::NotAuthenticated
        );
    }

    #[test]
    fn opaque_token_is_valid_with_unknown_expiry() {
        let status = TokenStatus::evaluate(Some("A1"), None, Utc::now());
        assert!(status.is_authenticated());
        assert_eq!(status.display_message(), "Valid (expiry unknown)");
    }

    #[test]
    fn display_messages() {
        assert_eq!(TokenStatus::NotAuthenticated.display_message(), "Not authenticated");
        assert!(
            TokenStatus::Valid {
                seconds_remaining: Some(7200),
                can_refresh: true
            }
            .display_message()
            .contains("hours")
        );
        assert!(
            TokenStatus::Expired { can_refresh: true }
                .display_message()
                .contains("refresh")
        );
    }
}
