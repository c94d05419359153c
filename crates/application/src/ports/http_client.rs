//! HTTP client port

use apiprobe_domain::{RequestSpec, ResponseSpec};
use async_trait::async_trait;
use thiserror::Error;

/// Failures that prevent a response from being produced.
///
/// A non-2xx status is not a transport error: the adapter returns it as a
/// normal response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request exceeded its timeout.
    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout {
        /// Target URL.
        url: String,
        /// Timeout that applied.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS resolution failed for {host}: {message}")]
    Dns {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error text.
        message: String,
    },

    /// The remote end refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed or was reset.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request URL is malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// The adapter's redirect limit was exceeded.
    #[error("too many redirects (limit {max})")]
    TooManyRedirects {
        /// Limit that applied.
        max: usize,
    },

    /// Anything else reported by the transport.
    #[error("{0}")]
    Other(String),
}

/// Port for sending one HTTP request.
///
/// Implementations must not retry: a scenario sees exactly the exchanges it
/// asked for.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends `request` and returns the normalized response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response could be obtained.
    async fn send(&self, request: &RequestSpec) -> Result<ResponseSpec, TransportError>;
}
