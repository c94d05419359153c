//! Normalized response type

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cookie::{Cookie, Cookies};
use crate::request::Headers;

/// Immutable snapshot of one HTTP exchange.
///
/// Built by the HTTP adapter from whatever the server sent. `json` holds the
/// parsed body when it is valid JSON and is `None` otherwise, so field
/// lookups never fail on a plain-text error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// URL the response came from (after any followed redirects)
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers, in arrival order
    pub headers: Headers,
    /// Cookies parsed from `Set-Cookie` headers
    pub cookies: Cookies,
    /// Response body as text
    pub body: String,
    /// Parsed body, if it is JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<serde_json::Value>,
    /// Response time
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl ResponseSpec {
    /// Builds a response, parsing cookies from `Set-Cookie` headers and the
    /// body as JSON when possible.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        status: u16,
        headers: Headers,
        body: impl Into<String>,
        duration: Duration,
    ) -> Self {
        let body = body.into();
        let cookies = headers
            .get_all("set-cookie")
            .filter_map(Cookie::from_set_cookie)
            .collect();
        let json = serde_json::from_str(&body).ok();
        Self {
            url: url.into(),
            status,
            headers,
            cookies,
            body,
            json,
            duration,
        }
    }

    /// Returns the first value of a header, ignoring name case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns the value of a cookie set by this response.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.value(name)
    }

    /// Returns the parsed top-level JSON object, if the body is one.
    #[must_use]
    pub fn json_object(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.json.as_ref().and_then(serde_json::Value::as_object)
    }

    /// Looks up a top-level JSON field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.json_object().and_then(|obj| obj.get(name))
    }

    /// Looks up a top-level JSON field as a string.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(serde_json::Value::as_str)
    }

    /// Looks up a top-level JSON field as an integer.
    ///
    /// Numeric strings are accepted since the user API returns ids as
    /// strings on some endpoints and as numbers on others.
    #[must_use]
    pub fn field_i64(&self, name: &str) -> Option<i64> {
        match self.field(name)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the `Location` header when present and non-empty.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location").filter(|l| !l.trim().is_empty())
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true if the status code indicates a redirect (3xx).
    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        self.status >= 300 && self.status < 400
    }

    /// Returns true if the status code indicates a client error (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Returns true if the status code indicates a server error (5xx).
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
