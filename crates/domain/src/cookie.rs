//! Cookie types.
//!
//! Cookies arrive in `Set-Cookie` response headers and are sent back by
//! name through [`crate::request::RequestSpec::with_cookie`]. The harness
//! never keeps a jar across requests: every scenario passes the cookies it
//! wants explicitly.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A cookie parsed from a `Set-Cookie` header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// `Domain` attribute, without a leading dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// `Path` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Expiration time (None for session cookies).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
    /// `HttpOnly` flag.
    #[serde(default)]
    pub http_only: bool,
    /// `Secure` flag.
    #[serde(default)]
    pub secure: bool,
}

impl Cookie {
    /// Create a session cookie with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            expires: None,
            http_only: false,
            secure: false,
        }
    }

    /// Set the expiration.
    #[must_use]
    pub const fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Check if the cookie had expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|exp| exp <= now)
    }

    /// Check if the cookie is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Parse from a `Set-Cookie` header value.
    ///
    /// Returns `None` when the header has no `name=value` pair. `Max-Age`
    /// wins over `Expires` when both are present.
    #[must_use]
    pub fn from_set_cookie(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Self::new(name, value.trim().trim_matches('"'));
        let mut max_age = None;

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let val = val.trim();
                match attr.trim().to_ascii_lowercase().as_str() {
                    "domain" => cookie.domain = Some(val.trim_start_matches('.').to_string()),
                    "path" => cookie.path = Some(val.to_string()),
                    "expires" => cookie.expires = parse_expires(val),
                    "max-age" => max_age = val.parse::<i64>().ok(),
                    _ => {}
                }
            } else {
                match part.to_ascii_lowercase().as_str() {
                    "httponly" => cookie.http_only = true,
                    "secure" => cookie.secure = true,
                    _ => {}
                }
            }
        }

        if let Some(secs) = max_age {
            cookie.expires = Some(expiry_after(Utc::now(), secs));
        }

        Some(cookie)
    }
}

/// Expiry for a `Max-Age` of `secs` seen at `now`.
///
/// Non-positive ages expire immediately; ages past the representable range
/// clamp to the latest instant (RFC 6265, section 5.2.2).
fn expiry_after(now: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
    if secs <= 0 {
        return DateTime::<Utc>::MIN_UTC;
    }
    TimeDelta::try_seconds(secs)
        .and_then(|age| now.checked_add_signed(age))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Parses both RFC 2822 dates and the dashed `Netscape` form
/// (`Thu, 22-Sep-2022 11:01:18 GMT`) still sent by many servers.
fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(exp) = DateTime::parse_from_rfc2822(value) {
        return Some(exp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| naive.and_utc())
}

/// The cookies set by one response, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cookies {
    items: Vec<Cookie>,
}

impl Cookies {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds a cookie.
    pub fn add(&mut self, cookie: Cookie) {
        self.items.push(cookie);
    }

    /// Returns the cookie named `name`. A later `Set-Cookie` overrides an
    /// earlier one with the same name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.items.iter().rev().find(|c| c.name == name)
    }

    /// Returns the value of the cookie named `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|c| c.value.as_str())
    }

    /// Returns true if a cookie with that name was set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns true if any cookie carries `value`.
    #[must_use]
    pub fn contains_value(&self, value: &str) -> bool {
        self.items.iter().any(|c| c.value == value)
    }

    /// Returns an iterator over all cookies.
    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.items.iter()
    }

    /// Returns the number of cookies.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no cookies were set.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Cookie> for Cookies {
    fn from_iter<T: IntoIterator<Item = Cookie>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
