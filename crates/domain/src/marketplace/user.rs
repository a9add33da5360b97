//! Account types.

use serde::{Deserialize, Serialize};

/// A marketplace user as returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: i64,
    /// Email address; read-only after registration.
    pub email: String,
    /// Username; read-only after registration.
    pub username: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}

impl User {
    /// Full name if set, otherwise the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Credentials for the login endpoint.
///
/// `login` accepts either the email or the username.
#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    /// Email or username.
    pub login: String,
    /// Plain password.
    pub password: String,
}

/// Fields accepted by the registration endpoint.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Plain password.
    pub password: String,
    /// Confirmation; defaults to `password` when absent.
    pub password_confirm: Option<String>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Registration body as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationPayload {
    /// Email address.
    pub email: String,
    /// Username.
    pub username: String,
    /// Plain password.
    pub password: String,
    /// Password confirmation.
    pub password_confirm: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl RegistrationForm {
    /// Builds the wire payload, filling in the confirmation if missing.
    #[must_use]
    pub fn into_payload(self) -> RegistrationPayload {
        let password_confirm = self
            .password_confirm
            .filter(|confirm| !confirm.is_empty())
            .unwrap_or_else(|| self.password.clone());

        RegistrationPayload {
            email: self.email,
            username: self.username,
            password: self.password,
            password_confirm,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

/// Partial profile update. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ProfileUpdate {
    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn confirmation_defaults_to_password() {
        let form = RegistrationForm {
            email: "ana@example.com".into(),
            username: "ana".into(),
            password: "s3cret-pass".into(),
            ..RegistrationForm::default()
        };
        assert_eq!(form.into_payload().password_confirm, "s3cret-pass");
    }

    #[test]
    fn explicit_confirmation_is_kept() {
        let form = RegistrationForm {
            password: "one".into(),
            password_confirm: Some("two".into()),
            ..RegistrationForm::default()
        };
        assert_eq!(form.into_payload().password_confirm, "two");
    }

    #[test]
    fn profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            phone: Some("+34 600 000 000".into()),
            ..ProfileUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();

        assert_eq!(json, serde_json::json!({"phone": "+34 600 000 000"}));
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut user: User = serde_json::from_value(serde_json::json!({
            "id": 1, "email": "ana@example.com", "username": "ana",
            "first_name": "", "last_name": "", "phone": null, "address": null
        }))
        .unwrap();
        assert_eq!(user.display_name(), "ana");

        user.first_name = "Ana".into();
        user.last_name = "Ruiz".into();
        assert_eq!(user.display_name(), "Ana Ruiz");
    }
}
