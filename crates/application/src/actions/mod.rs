//! Endpoint actions.
//!
//! Each action builds one request, sends it through the [`HttpClient`] port
//! and returns the raw [`ResponseSpec`]. Actions never check statuses or
//! bodies: that is the scenario's job.

mod playground;
mod user;

use std::sync::Arc;

use apiprobe_domain::{
    AuthMaterials, HarnessConfig, PayloadEncoding, RequestBody, RequestSpec, ResponseSpec,
};
use tracing::warn;

use crate::error::HarnessResult;
use crate::ports::HttpClient;

pub use playground::PlaygroundApi;
pub use user::UserApi;

/// Client and configuration shared by every action of one scenario.
pub struct ApiContext<C> {
    client: Arc<C>,
    config: Arc<HarnessConfig>,
}

impl<C> Clone for ApiContext<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            config: Arc::clone(&self.config),
        }
    }
}

impl<C: HttpClient> ApiContext<C> {
    /// Bundles a client with the configuration it serves.
    #[must_use]
    pub const fn new(client: Arc<C>, config: Arc<HarnessConfig>) -> Self {
        Self { client, config }
    }

    /// The harness configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Absolute URL of an endpoint path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not join onto the base URL.
    pub fn url(&self, path: &str) -> HarnessResult<String> {
        Ok(self.config.endpoint(path)?.into())
    }

    /// Sends a request through the port.
    ///
    /// # Errors
    ///
    /// Returns a transport error when no response was obtained.
    pub async fn send(&self, request: RequestSpec) -> HarnessResult<ResponseSpec> {
        Ok(self.client.send(&request).await?)
    }

    /// Encodes structured fields the way the configuration asks.
    #[must_use]
    pub fn payload(&self, fields: Vec<(String, String)>) -> RequestBody {
        match self.config.payload_encoding {
            PayloadEncoding::Form => RequestBody::form(fields),
            PayloadEncoding::Json => RequestBody::json(serde_json::Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect(),
            )),
        }
    }

    /// Attaches auth materials when both halves are present.
    ///
    /// A partial pair is dropped and the request goes out unauthenticated.
    #[must_use]
    pub fn authorize(&self, request: RequestSpec, materials: &AuthMaterials) -> RequestSpec {
        let keys = &self.config.session_keys;
        match materials.pair() {
            Some((token, cookie)) => request
                .with_header(&keys.csrf_header, token)
                .with_cookie(&keys.session_cookie, cookie),
            None => {
                if materials.is_partial() {
                    warn!(
                        url = %request.url,
                        has_token = materials.csrf_token.is_some(),
                        has_cookie = materials.session_cookie.is_some(),
                        "partial auth materials, sending unauthenticated"
                    );
                }
                request
            }
        }
    }
}
