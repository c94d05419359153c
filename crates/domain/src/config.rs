//! Harness configuration.
//!
//! One immutable `HarnessConfig` is built per scenario (usually by the
//! infrastructure loader) and handed to the HTTP adapter and the action
//! layer. Nothing reads process-wide defaults after construction.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};
use crate::session::SessionKeys;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default ceiling for the server-advertised job sleep.
pub const DEFAULT_MAX_POLL_SLEEP: Duration = Duration::from_secs(30);

/// Default bound on redirect-chain traversal.
pub const DEFAULT_MAX_REDIRECT_HOPS: usize = 50;

/// Default number of redirects the adapter follows transparently.
pub const DEFAULT_MAX_FOLLOWED_REDIRECTS: usize = 10;

/// How structured payloads (registration, login, edit) are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// `application/x-www-form-urlencoded`
    #[default]
    Form,
    /// `application/json`
    Json,
}

/// Configuration shared by every component of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Root URL of the API under test; endpoint paths are joined onto it.
    pub base_url: Url,
    /// Timeout applied to every request unless the request overrides it.
    pub request_timeout: Duration,
    /// Upper bound on the sleep between job polls.
    pub max_poll_sleep: Duration,
    /// Hops after which redirect traversal gives up.
    pub max_redirect_hops: usize,
    /// Redirects the adapter follows when following is enabled.
    pub max_followed_redirects: usize,
    /// `User-Agent` sent when the request sets none.
    pub user_agent: String,
    /// Encoding of structured payloads.
    pub payload_encoding: PayloadEncoding,
    /// Names of the auth materials in login responses.
    pub session_keys: SessionKeys,
}

impl HarnessConfig {
    /// Creates a configuration with defaults for everything but the base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_poll_sleep: DEFAULT_MAX_POLL_SLEEP,
            max_redirect_hops: DEFAULT_MAX_REDIRECT_HOPS,
            max_followed_redirects: DEFAULT_MAX_FOLLOWED_REDIRECTS,
            user_agent: concat!("apiprobe/", env!("CARGO_PKG_VERSION")).to_string(),
            payload_encoding: PayloadEncoding::default(),
            session_keys: SessionKeys::default(),
        }
    }

    /// Parses `base_url` and creates a configuration from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or not HTTP(S).
    pub fn from_base_url(base_url: &str) -> DomainResult<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_url}")))?;
        let config = Self::new(url);
        config.validate()?;
        Ok(config)
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the poll-sleep ceiling.
    #[must_use]
    pub const fn with_max_poll_sleep(mut self, ceiling: Duration) -> Self {
        self.max_poll_sleep = ceiling;
        self
    }

    /// Sets the redirect traversal bound.
    #[must_use]
    pub const fn with_max_redirect_hops(mut self, hops: usize) -> Self {
        self.max_redirect_hops = hops;
        self
    }

    /// Sets the payload encoding.
    #[must_use]
    pub const fn with_payload_encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.payload_encoding = encoding;
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-HTTP base URL, a zero timeout or a zero
    /// redirect bound.
    pub fn validate(&self) -> DomainResult<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "base URL must be http or https: {}",
                self.base_url
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(DomainError::InvalidConfig(
                "request timeout must be positive".to_string(),
            ));
        }
        if self.max_redirect_hops == 0 {
            return Err(DomainError::InvalidConfig(
                "max redirect hops must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves an endpoint path under the base URL.
    ///
    /// `path` is always relative to the base, so a base with a path prefix
    /// (`http://host/learnqa/`) keeps it whether or not `path` starts with `/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is malformed.
    pub fn endpoint(&self, path: &str) -> DomainResult<Url> {
        with_trailing_slash(self.base_url.clone())
            .join(path.trim_start_matches('/'))
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {path}")))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::from_base_url("https://playground.learnqa.ru").unwrap();
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.max_redirect_hops, 50);
        assert_eq!(config.payload_encoding, PayloadEncoding::Form);
        assert!(config.user_agent.starts_with("apiprobe/"));
    }

    #[test]
    fn test_endpoint_joins_absolute_paths() {
        let config = HarnessConfig::from_base_url("https://playground.learnqa.ru/").unwrap();
        assert_eq!(
            config.endpoint("/api/user/login").unwrap().as_str(),
            "https://playground.learnqa.ru/api/user/login"
        );
        assert_eq!(
            config.endpoint("/ajax/api/longtime_job").unwrap().as_str(),
            "https://playground.learnqa.ru/ajax/api/longtime_job"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        for base in ["http://localhost:8080/learnqa/", "http://localhost:8080/learnqa"] {
            let config = HarnessConfig::from_base_url(base).unwrap();
            assert_eq!(config.base_url.as_str(), "http://localhost:8080/learnqa/");
            assert_eq!(
                config.endpoint("/api/user/login").unwrap().as_str(),
                "http://localhost:8080/learnqa/api/user/login"
            );
            assert_eq!(
                config.endpoint("api/user/2").unwrap().as_str(),
                "http://localhost:8080/learnqa/api/user/2"
            );
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(HarnessConfig::from_base_url("not a url").is_err());
        assert!(HarnessConfig::from_base_url("ftp://example.com").is_err());

        let config = HarnessConfig::from_base_url("http://localhost:8080")
            .unwrap()
            .with_request_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(DomainError::InvalidConfig(_))
        ));

        let config = HarnessConfig::from_base_url("http://localhost:8080")
            .unwrap()
            .with_max_redirect_hops(0);
        assert!(config.validate().is_err());
    }
}
