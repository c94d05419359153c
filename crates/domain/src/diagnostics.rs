//! Typed bodies of the diagnostic endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Classification returned by the user-agent check endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentVerdict {
    /// `Mobile`, `Web`, `Googlebot`, ...
    pub platform: String,
    /// `Chrome`, `No`, `Unknown`, ...
    pub browser: String,
    /// `Android`, `iOS`, `iPhone`, `No`, ...
    pub device: String,
}

impl fmt::Display for UserAgentVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "platform: {}, browser: {}, device: {}",
            self.platform, self.browser, self.device
        )
    }
}

impl FromStr for UserAgentVerdict {
    type Err = DomainError;

    /// Parses `platform: Mobile, browser: No, device: Android`.
    fn from_str(s: &str) -> DomainResult<Self> {
        let mut platform = None;
        let mut browser = None;
        let mut device = None;

        for pair in s.split(',') {
            let (key, value) = pair
                .split_once(':')
                .ok_or_else(|| DomainError::InvalidVerdict(s.to_string()))?;
            let value = Some(value.trim().to_string());
            match key.trim() {
                "platform" => platform = value,
                "browser" => browser = value,
                "device" => device = value,
                _ => return Err(DomainError::InvalidVerdict(s.to_string())),
            }
        }

        match (platform, browser, device) {
            (Some(platform), Some(browser), Some(device)) => Ok(Self {
                platform,
                browser,
                device,
            }),
            _ => Err(DomainError::InvalidVerdict(s.to_string())),
        }
    }
}

/// One entry of the JSON homework fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeworkMessage {
    /// Message text.
    pub message: String,
    /// Timestamp as the server formats it.
    pub timestamp: String,
}

/// Body of the JSON homework fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonHomework {
    /// Messages, in server order.
    pub messages: Vec<HomeworkMessage>,
}
