//! List responses, paginated or not.

use serde::{Deserialize, Serialize};

/// A list endpoint response.
///
/// Depending on server settings list endpoints answer either with a bare
/// array or with a page envelope; both decode into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    /// Page envelope.
    Paginated {
        /// Total number of items across all pages.
        count: u64,
        /// URL of the next page.
        #[serde(default)]
        next: Option<String>,
        /// URL of the previous page.
        #[serde(default)]
        previous: Option<String>,
        /// Items on this page.
        results: Vec<T>,
    },
    /// Bare array.
    Plain(Vec<T>),
}

impl<T> Page<T> {
    /// Items of this page.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginated { results, .. } | Self::Plain(results) => results,
        }
    }

    /// Returns true if the server reported a further page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        matches!(self, Self::Paginated { next: Some(_), .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_bare_arrays() {
        let page: Page<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert!(!page.has_next());
        assert_eq!(page.into_items(), vec![1, 2, 3]);
    }

    #[test]
    fn decodes_envelopes() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"count": 40, "next": "http://x/?page=2", "previous": null, "results": [1]}"#,
        )
        .unwrap();
        assert!(page.has_next());
        assert_eq!(page.into_items(), vec![1]);
    }
}
