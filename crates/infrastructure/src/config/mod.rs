//! Configuration loading.
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML
//! file (`apiprobe.toml` in the working directory, or the file named by
//! `APIPROBE_CONFIG`), then `APIPROBE_*` environment variables.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use apiprobe_application::HarnessError;
use apiprobe_domain::config::{
    DEFAULT_MAX_FOLLOWED_REDIRECTS, DEFAULT_MAX_POLL_SLEEP, DEFAULT_MAX_REDIRECT_HOPS,
    DEFAULT_REQUEST_TIMEOUT,
};
use apiprobe_domain::{DomainError, HarnessConfig, PayloadEncoding, SessionKeys};
use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Base URL of the public playground API.
pub const DEFAULT_BASE_URL: &str = "https://playground.learnqa.ru";

/// Prefix of the environment variables read by the loader.
pub const ENV_PREFIX: &str = "APIPROBE";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "APIPROBE_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "apiprobe.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// The loaded values are out of range.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] DomainError),
}

impl From<ConfigError> for HarnessError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    base_url: String,
    request_timeout_ms: u64,
    max_poll_sleep_secs: u64,
    max_redirect_hops: usize,
    max_followed_redirects: usize,
    user_agent: Option<String>,
    payload_encoding: PayloadEncoding,
    csrf_header: Option<String>,
    session_cookie: Option<String>,
    user_id_field: Option<String>,
}

impl RawConfig {
    fn into_config(self) -> Result<HarnessConfig, ConfigError> {
        let mut config = HarnessConfig::from_base_url(&self.base_url)?
            .with_request_timeout(Duration::from_millis(self.request_timeout_ms))
            .with_max_poll_sleep(Duration::from_secs(self.max_poll_sleep_secs))
            .with_max_redirect_hops(self.max_redirect_hops)
            .with_payload_encoding(self.payload_encoding);
        config.max_followed_redirects = self.max_followed_redirects;
        if let Some(agent) = self.user_agent {
            config.user_agent = agent;
        }

        let defaults = SessionKeys::default();
        config.session_keys = SessionKeys {
            csrf_header: self.csrf_header.unwrap_or(defaults.csrf_header),
            session_cookie: self.session_cookie.unwrap_or(defaults.session_cookie),
            user_id_field: self.user_id_field.unwrap_or(defaults.user_id_field),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Where the loader reads from.
///
/// The default reads the process environment; tests pin both the file and
/// the variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    file: Option<PathBuf>,
    env: Option<HashMap<String, String>>,
}

impl ConfigSources {
    /// Reads from the process environment and the default file locations.
    #[must_use]
    pub fn from_process() -> Self {
        Self::default()
    }

    /// Reads this file instead of looking one up.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Reads variables from `vars` instead of the process environment.
    #[must_use]
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    fn env_var(&self, name: &str) -> Option<String> {
        match &self.env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    /// The config file to read, and whether it must exist.
    fn config_file(&self) -> Option<(PathBuf, bool)> {
        if let Some(path) = &self.file {
            return Some((path.clone(), true));
        }
        if let Some(path) = self.env_var(CONFIG_PATH_VAR) {
            return Some((PathBuf::from(path), true));
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        fallback.exists().then(|| (fallback.to_path_buf(), false))
    }
}

/// Loads the harness configuration from the process environment.
///
/// # Errors
///
/// Returns an error if a source is unreadable or a value is invalid.
pub fn load_config() -> Result<HarnessConfig, ConfigError> {
    load_config_from(&ConfigSources::from_process())
}

/// Loads the harness configuration from explicit sources.
///
/// # Errors
///
/// Returns an error if a source is unreadable or a value is invalid.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn load_config_from(sources: &ConfigSources) -> Result<HarnessConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default(
            "request_timeout_ms",
            DEFAULT_REQUEST_TIMEOUT.as_millis() as i64,
        )?
        .set_default("max_poll_sleep_secs", DEFAULT_MAX_POLL_SLEEP.as_secs() as i64)?
        .set_default("max_redirect_hops", DEFAULT_MAX_REDIRECT_HOPS as i64)?
        .set_default(
            "max_followed_redirects",
            DEFAULT_MAX_FOLLOWED_REDIRECTS as i64,
        )?
        .set_default("payload_encoding", "form")?;

    if let Some((path, required)) = sources.config_file() {
        debug!(path = %path.display(), required, "reading config file");
        builder = builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(required),
        );
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(sources.env.clone()),
    );

    let raw: RawConfig = builder.build()?.try_deserialize()?;
    let config = raw.into_config()?;
    debug!(base_url = %config.base_url, "configuration loaded");
    Ok(config)
}
