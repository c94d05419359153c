//! Redirect-chain traversal.

use std::sync::Arc;

use apiprobe_domain::{HarnessConfig, RedirectHop, RedirectTrace, RequestSpec};
use tracing::{debug, info};
use url::Url;

use crate::actions::ApiContext;
use crate::error::{HarnessError, HarnessResult};
use crate::ports::HttpClient;

/// Endpoint that answers with a multi-hop redirect chain.
pub const LONG_REDIRECT_PATH: &str = "/api/long_redirect";

/// Walks a redirect chain one no-follow request at a time.
///
/// Every hop is recorded. The walk ends at the first 200; any other status
/// must carry a `Location` to continue.
pub struct RedirectFollower<C> {
    ctx: ApiContext<C>,
}

impl<C: HttpClient> RedirectFollower<C> {
    /// Creates a follower over `client`.
    #[must_use]
    pub const fn new(client: Arc<C>, config: Arc<HarnessConfig>) -> Self {
        Self {
            ctx: ApiContext::new(client, config),
        }
    }

    /// Creates a follower from an existing context.
    #[must_use]
    pub const fn from_context(ctx: ApiContext<C>) -> Self {
        Self { ctx }
    }

    /// Follows the chain starting at the long-redirect endpoint.
    ///
    /// # Errors
    ///
    /// See [`Self::trace`].
    pub async fn trace_long_redirect(&self) -> HarnessResult<RedirectTrace> {
        let start = self.ctx.url(LONG_REDIRECT_PATH)?;
        self.trace(&start).await
    }

    /// Follows the chain starting at `start` until a 200.
    ///
    /// # Errors
    ///
    /// - `ProtocolViolation` if a non-200 hop has no usable `Location`
    /// - `RedirectLoopSuspected` once `max_redirect_hops` requests were made
    ///   without reaching a 200
    /// - transport errors from the client
    pub async fn trace(&self, start: &str) -> HarnessResult<RedirectTrace> {
        let max_hops = self.ctx.config().max_redirect_hops;
        let mut trace = RedirectTrace::new();
        let mut current = start.to_string();

        loop {
            if trace.len() >= max_hops {
                return Err(HarnessError::RedirectLoopSuspected {
                    start: start.to_string(),
                    hops: max_hops,
                    trace,
                });
            }

            let response = self
                .ctx
                .send(RequestSpec::get(&current).without_redirects())
                .await?;
            let location = response.location().map(str::to_string);
            debug!(url = %current, status = response.status, ?location, "redirect hop");

            trace.push(RedirectHop {
                url: current.clone(),
                status: response.status,
                location: location.clone(),
            });

            if response.status == 200 {
                info!(
                    start,
                    hops = trace.len(),
                    final_url = %current,
                    "redirect chain terminated"
                );
                return Ok(trace);
            }

            let Some(location) = location else {
                return Err(HarnessError::protocol(
                    &current,
                    format!("status {} without a Location header", response.status),
                ));
            };
            current = resolve(&current, &location)?;
        }
    }
}

fn resolve(current: &str, location: &str) -> HarnessResult<String> {
    Url::parse(current)
        .and_then(|base| base.join(location))
        .map(String::from)
        .map_err(|e| HarnessError::protocol(current, format!("bad Location '{location}': {e}")))
}
