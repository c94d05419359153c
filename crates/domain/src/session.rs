//! Authenticated session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Names under which the server hands out auth materials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeys {
    /// Response and request header carrying the CSRF token.
    pub csrf_header: String,
    /// Cookie carrying the session id.
    pub session_cookie: String,
    /// JSON field of the login response carrying the user id.
    pub user_id_field: String,
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            csrf_header: "x-csrf-token".to_string(),
            session_cookie: "auth_sid".to_string(),
            user_id_field: "user_id".to_string(),
        }
    }
}

/// An authenticated session produced by a successful login.
///
/// Owned by the scenario that logged in. The CSRF token and cookie are
/// always present together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    csrf_token: String,
    session_cookie: String,
    user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session from fully extracted auth materials.
    #[must_use]
    pub fn new(
        csrf_token: impl Into<String>,
        session_cookie: impl Into<String>,
        user_id: i64,
    ) -> Self {
        Self {
            csrf_token: csrf_token.into(),
            session_cookie: session_cookie.into(),
            user_id,
            expires_at: None,
        }
    }

    /// Record when the session cookie expires.
    #[must_use]
    pub const fn with_expiry(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// The CSRF token.
    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// The session cookie value.
    #[must_use]
    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    /// The id of the logged-in user.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.user_id
    }

    /// When the session cookie expires, if the server said so.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Check whether the session cookie had expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Check whether the session cookie has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Auth materials for attaching to a request.
    #[must_use]
    pub fn materials(&self) -> AuthMaterials {
        AuthMaterials {
            csrf_token: Some(self.csrf_token.clone()),
            session_cookie: Some(self.session_cookie.clone()),
        }
    }
}

/// Raw auth materials as a scenario holds them.
///
/// Unlike [`Session`], either half may be missing, which lets negative
/// scenarios send a token without its cookie. Such a partial pair is never
/// attached: the request goes out unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMaterials {
    /// CSRF token, if known.
    pub csrf_token: Option<String>,
    /// Session cookie value, if known.
    pub session_cookie: Option<String>,
}

impl AuthMaterials {
    /// No auth materials at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            csrf_token: None,
            session_cookie: None,
        }
    }

    /// Returns the token and cookie when both are present.
    #[must_use]
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.csrf_token, &self.session_cookie) {
            (Some(token), Some(cookie)) => Some((token, cookie)),
            _ => None,
        }
    }

    /// Returns true if exactly one half is present.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.csrf_token.is_some() != self.session_cookie.is_some()
    }
}

impl From<&Session> for AuthMaterials {
    fn from(session: &Session) -> Self {
        session.materials()
    }
}

/// Outcome of checking a session against the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The server still recognizes the session's user.
    Active,
    /// The session cookie's expiry has passed.
    Expired,
    /// The server no longer honors the session.
    Denied,
}
