//! HTTP Request body types

use serde::{Deserialize, Serialize};

/// Content type sent with plain string bodies unless the caller overrides it.
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Content type of form-urlencoded bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Content type of JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP request body.
///
/// The three representations are mutually exclusive; the adapter serializes
/// whichever one is given and sets the matching `Content-Type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBody {
    /// No body
    #[default]
    None,
    /// Raw string body sent as-is.
    Text {
        /// The body content
        content: String,
        /// The content type
        content_type: String,
    },
    /// Form fields, encoded as `application/x-www-form-urlencoded`.
    Form {
        /// Ordered field pairs
        fields: Vec<(String, String)>,
    },
    /// Structured JSON body.
    Json {
        /// The JSON document
        value: serde_json::Value,
    },
}

impl RequestBody {
    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            content_type: TEXT_CONTENT_TYPE.to_string(),
        }
    }

    /// Creates a raw body with an explicit content type.
    #[must_use]
    pub fn raw(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    /// Creates a form body from field pairs.
    #[must_use]
    pub fn form<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Creates a JSON body.
    #[must_use]
    pub const fn json(value: serde_json::Value) -> Self {
        Self::Json { value }
    }

    /// Returns whether there is no body.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the content type if applicable.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Text { content_type, .. } => Some(content_type),
            Self::Form { .. } => Some(FORM_CONTENT_TYPE),
            Self::Json { .. } => Some(JSON_CONTENT_TYPE),
        }
    }
}
