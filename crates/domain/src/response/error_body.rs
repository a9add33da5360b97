//! Error payloads returned by the marketplace backend.

use std::collections::BTreeMap;

use serde::Serialize;

/// Keys that carry a single human-readable message, in lookup order.
const MESSAGE_KEYS: [&str; 3] = ["detail", "message", "error"];

/// Key the backend uses for errors that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Body of a non-2xx response.
///
/// The backend answers validation failures with a map of field names to
/// message lists, and other failures with a `detail`, `message` or `error`
/// string. Bodies that are not JSON are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorBody {
    /// Raw body text.
    pub raw: String,
    /// Parsed JSON, if the body was JSON.
    pub json: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Parses a raw response body.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(bytes).into_owned();
        let json = serde_json::from_slice(bytes).ok();
        Self { raw, json }
    }

    /// Returns the single message the backend attached, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let object = self.json.as_ref()?.as_object()?;
        MESSAGE_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(first_message))
    }

    /// Returns field-level validation errors.
    ///
    /// Both `{"field": ["a", "b"]}` and `{"field": "a"}` shapes are accepted.
    /// Message-only keys (`detail`, `message`, `error`) are not fields.
    #[must_use]
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        let Some(object) = self.json.as_ref().and_then(|v| v.as_object()) else {
            return BTreeMap::new();
        };

        object
            .iter()
            .filter(|(key, _)| !MESSAGE_KEYS.contains(&key.as_str()))
            .filter_map(|(key, value)| {
                let messages = messages_of(value);
                (!messages.is_empty()).then(|| (key.clone(), messages))
            })
            .collect()
    }

    /// Returns true if the body carried no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Best description for display: the message, the first field error,
    /// or the raw body.
    #[must_use]
    pub fn summary(&self) -> String {
        if let Some(message) = self.message() {
            return message;
        }
        if let Some((field, messages)) = self.field_errors().into_iter().next() {
            let first = messages.into_iter().next().unwrap_or_default();
            return if field == NON_FIELD_ERRORS {
                first
            } else {
                format!("{field}: {first}")
            };
        }
        self.raw.trim().to_string()
    }
}

fn first_message(value: &serde_json::Value) -> Option<String> {
    messages_of(value).into_iter().next()
}

fn messages_of(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
        _ => Vec::new(),
    }
}
