//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication for the harness.

use std::time::{Duration, Instant};

use apiprobe_application::ports::{HttpClient, TransportError};
use apiprobe_domain::{
    HarnessConfig, Header, Headers, HttpMethod, RequestBody, RequestSpec, ResponseSpec,
};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use tracing::debug;

/// HTTP client implementation using reqwest.
///
/// Holds two clients built from the same configuration: one follows
/// redirects up to the configured limit, the other never does. Requests
/// pick one by their `follow_redirects` flag. Neither keeps a cookie jar.
pub struct ReqwestHttpClient {
    following: Client,
    direct: Client,
    default_timeout: Duration,
    max_redirects: usize,
}

impl ReqwestHttpClient {
    /// Creates a client from the harness configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &HarnessConfig) -> Result<Self, TransportError> {
        Ok(Self {
            following: Self::build(config, Policy::limited(config.max_followed_redirects))?,
            direct: Self::build(config, Policy::none())?,
            default_timeout: config.request_timeout,
            max_redirects: config.max_followed_redirects,
        })
    }

    fn build(config: &HarnessConfig, policy: Policy) -> Result<Client, TransportError> {
        Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(policy)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
        }
    }

    /// Serializes the body, returning its payload and default content type.
    fn encode_body(body: &RequestBody) -> Result<Option<(String, &str)>, TransportError> {
        let Some(content_type) = body.content_type() else {
            return Ok(None);
        };
        let payload = match body {
            RequestBody::None => return Ok(None),
            RequestBody::Text { content, .. } => content.clone(),
            RequestBody::Form { fields } => serde_urlencoded::to_string(fields)
                .map_err(|e| TransportError::InvalidBody(format!("form encoding: {e}")))?,
            RequestBody::Json { value } => serde_json::to_string(value)
                .map_err(|e| TransportError::InvalidBody(format!("JSON encoding: {e}")))?,
        };
        Ok(Some((payload, content_type)))
    }

    /// Maps reqwest errors to the port's `TransportError`.
    fn map_error(&self, error: &reqwest::Error, url: &str, timeout: Duration) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                url: url.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            };
        }

        let host = || {
            error
                .url()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_else(|| "unknown".to_string())
        };

        if error.is_connect() {
            let message = format!("{error:?}").to_lowercase();
            if message.contains("dns") || message.contains("resolve") {
                return TransportError::Dns {
                    host: host(),
                    message: error.to_string(),
                };
            }
            if message.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(error.to_string());
        }

        if error.is_redirect() {
            return TransportError::TooManyRedirects {
                max: self.max_redirects,
            };
        }

        if error.is_body() || error.is_decode() {
            return TransportError::BodyRead(error.to_string());
        }

        if error.is_builder() {
            return TransportError::Other(format!("invalid request to {url}: {error}"));
        }

        if error.is_request() {
            return TransportError::ConnectionFailed(error.to_string());
        }

        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseSpec, TransportError> {
        let url = request
            .full_url()
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url)))?;
        let timeout = request.timeout.unwrap_or(self.default_timeout);
        let client = if request.follow_redirects {
            &self.following
        } else {
            &self.direct
        };

        let mut builder = client
            .request(Self::to_reqwest_method(request.method), url.as_str())
            .timeout(timeout);

        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }

        if let Some(cookies) = request.cookie_header() {
            builder = builder.header(reqwest::header::COOKIE, cookies);
        }

        if let Some((payload, content_type)) = Self::encode_body(&request.body)? {
            if !request.headers.contains("content-type") {
                builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
            }
            builder = builder.body(payload);
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| self.map_error(&e, url.as_str(), timeout))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                Header::new(
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::BodyRead(e.to_string()))?;
        let duration = start.elapsed();

        debug!(
            method = %request.method,
            url = %url,
            status,
            elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "request completed"
        );

        Ok(ResponseSpec::new(final_url, status, headers, body, duration))
    }
}
