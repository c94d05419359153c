//! Application error types

use apiprobe_domain::{AssertionMismatch, DomainError, RedirectTrace};
use thiserror::Error;

use crate::ports::TransportError;

/// Errors surfaced to a scenario.
///
/// Every variant carries enough context to tell which request failed and
/// how; nothing below the scenario swallows one.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Login did not yield usable auth materials.
    #[error("authentication failed at {url}: {reason}")]
    Authentication {
        /// URL of the login request.
        url: String,
        /// What was wrong with the response.
        reason: String,
    },

    /// A call the harness depends on answered with the wrong status.
    #[error("unexpected status from {url}: expected {expected:?}, got {actual}; body: {body}")]
    UnexpectedStatus {
        /// URL of the request.
        url: String,
        /// Acceptable status codes.
        expected: Vec<u16>,
        /// Status actually received.
        actual: u16,
        /// Response body, for diagnosis.
        body: String,
    },

    /// A response check failed.
    #[error(transparent)]
    Assertion(#[from] AssertionMismatch),

    /// Redirect traversal hit its hop bound without reaching a 200.
    #[error("redirect chain from {start} did not terminate within {hops} hops")]
    RedirectLoopSuspected {
        /// URL the traversal started from.
        start: String,
        /// Hop bound that was reached.
        hops: usize,
        /// Hops recorded before giving up.
        trace: RedirectTrace,
    },

    /// The server answered in a shape the harness cannot work with.
    #[error("protocol violation at {url}: {reason}")]
    ProtocolViolation {
        /// URL of the offending response.
        url: String,
        /// What was missing or malformed.
        reason: String,
    },

    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl HarnessError {
    /// Builds an [`HarnessError::UnexpectedStatus`] from a response.
    #[must_use]
    pub fn unexpected_status(
        response: &apiprobe_domain::ResponseSpec,
        expected: impl Into<Vec<u16>>,
    ) -> Self {
        Self::UnexpectedStatus {
            url: response.url.clone(),
            expected: expected.into(),
            actual: response.status,
            body: response.body.clone(),
        }
    }

    /// Builds an [`HarnessError::ProtocolViolation`].
    #[must_use]
    pub fn protocol(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
