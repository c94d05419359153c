//! Async job polling.

use std::sync::Arc;
use std::time::Duration;

use apiprobe_domain::{AsyncJobState, HarnessConfig, JobStatus, RequestSpec, ResponseSpec};
use tracing::{info, warn};

use crate::actions::ApiContext;
use crate::error::{HarnessError, HarnessResult};
use crate::ports::HttpClient;

/// Endpoint that creates and reports on long-running jobs.
pub const JOB_PATH: &str = "/ajax/api/longtime_job";

/// Drives one job from submission to its final status.
///
/// The policy is a single retry: poll, and if the job is not ready, sleep
/// for the advertised duration (capped by `max_poll_sleep`) and poll once
/// more. Whatever the second poll reports is final.
pub struct JobPoller<C> {
    ctx: ApiContext<C>,
}

impl<C: HttpClient> JobPoller<C> {
    /// Creates a poller over `client`.
    #[must_use]
    pub const fn new(client: Arc<C>, config: Arc<HarnessConfig>) -> Self {
        Self {
            ctx: ApiContext::new(client, config),
        }
    }

    /// Creates a poller from an existing context.
    #[must_use]
    pub const fn from_context(ctx: ApiContext<C>) -> Self {
        Self { ctx }
    }

    /// Creates a job and reads its token and advertised duration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolViolation` if `token` or `seconds` is missing.
    pub async fn submit(&self) -> HarnessResult<AsyncJobState> {
        let response = self.ctx.send(RequestSpec::get(self.ctx.url(JOB_PATH)?)).await?;
        if response.status != 200 {
            return Err(HarnessError::unexpected_status(&response, [200]));
        }

        let token = response
            .field_str("token")
            .ok_or_else(|| HarnessError::protocol(&response.url, "job response lacks 'token'"))?;
        let seconds = response
            .field_i64("seconds")
            .and_then(|s| u64::try_from(s).ok())
            .ok_or_else(|| HarnessError::protocol(&response.url, "job response lacks 'seconds'"))?;

        info!(token, seconds, "job submitted");
        Ok(AsyncJobState::submitted(token, seconds))
    }

    /// Asks for the status of the job once, updating `state`.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedStatus` if the status check does not answer 200.
    pub async fn poll(&self, state: &mut AsyncJobState) -> HarnessResult<ResponseSpec> {
        let request = RequestSpec::get(self.ctx.url(JOB_PATH)?).with_query("token", &state.token);
        let response = self.ctx.send(request).await?;
        if response.status != 200 {
            return Err(HarnessError::unexpected_status(&response, [200]));
        }

        let result = response.field("result").map(|value| {
            value
                .as_str()
                .map_or_else(|| value.to_string(), str::to_string)
        });
        state.record_poll(response.field_str("status").map(str::to_string), result);
        info!(
            token = %state.token,
            poll = state.polls,
            status = ?state.status,
            "job polled"
        );
        Ok(response)
    }

    /// Polls a submitted job to its final status.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::poll`].
    pub async fn complete(&self, state: &mut AsyncJobState) -> HarnessResult<()> {
        self.poll(state).await?;
        if state.status == JobStatus::NotReady {
            tokio::time::sleep(self.wait_for(state)).await;
            self.poll(state).await?;
        }
        state.finish();
        Ok(())
    }

    /// Submits a job and polls it to its final status.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::submit`] and [`Self::poll`].
    pub async fn run(&self) -> HarnessResult<AsyncJobState> {
        let mut state = self.submit().await?;
        self.complete(&mut state).await?;
        Ok(state)
    }

    fn wait_for(&self, state: &AsyncJobState) -> Duration {
        let advertised = Duration::from_secs(state.remaining_seconds);
        let ceiling = self.ctx.config().max_poll_sleep;
        if advertised > ceiling {
            warn!(
                advertised_secs = state.remaining_seconds,
                ceiling_secs = ceiling.as_secs(),
                "capping job wait"
            );
        }
        advertised.min(ceiling)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedClient, response};
    use apiprobe_domain::JobPhase;
    use pretty_assertions::assert_eq;
    use tokio::time::Instant;

    const URL: &str = "https://playground.learnqa.ru/ajax/api/longtime_job";

    fn poller(max_sleep: Duration) -> (Arc<ScriptedClient>, JobPoller<ScriptedClient>) {
        let client = Arc::new(ScriptedClient::new());
        let config = HarnessConfig::from_base_url("https://playground.learnqa.ru")
            .unwrap()
            .with_max_poll_sleep(max_sleep);
        (Arc::clone(&client), JobPoller::new(client, Arc::new(config)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_ready_then_ready_after_sleep() {
        let (client, poller) = poller(Duration::from_secs(30));
        client
            .push(response(URL, 200, &[], r#"{"token":"abc","seconds":3}"#))
            .push(response(URL, 200, &[], r#"{"status":"Job is NOT ready"}"#))
            .push(response(
                URL,
                200,
                &[],
                r#"{"status":"Job is ready","result":"42"}"#,
            ));

        let start = Instant::now();
        let state = poller.run().await.unwrap();

        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert_eq!(state.status, JobStatus::Ready);
        assert_eq!(state.result.as_deref(), Some("42"));
        assert_eq!(state.phase, JobPhase::Ready);
        assert_eq!(state.polls, 2);

        let sent = client.requests();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].query.is_empty());
        assert_eq!(sent[1].query.get("token"), Some("abc"));
        assert_eq!(sent[2].query.get("token"), Some("abc"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_first_poll_does_not_sleep() {
        let (client, poller) = poller(Duration::from_secs(30));
        client
            .push(response(URL, 200, &[], r#"{"token":"abc","seconds":0}"#))
            .push(response(URL, 200, &[], r#"{"status":"Job is ready","result":"1"}"#));

        let start = Instant::now();
        let state = poller.run().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(state.polls, 1);
        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_retry_even_if_still_not_ready() {
        let (client, poller) = poller(Duration::from_secs(30));
        client
            .push(response(URL, 200, &[], r#"{"token":"abc","seconds":2}"#))
            .push(response(URL, 200, &[], r#"{"status":"Job is NOT ready"}"#))
            .push(response(URL, 200, &[], r#"{"status":"Job is NOT ready"}"#));

        let state = poller.run().await.unwrap();
        assert_eq!(state.status, JobStatus::NotReady);
        assert!(state.is_terminal());
        assert_eq!(client.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_is_capped() {
        let (client, poller) = poller(Duration::from_secs(5));
        client
            .push(response(URL, 200, &[], r#"{"token":"abc","seconds":600}"#))
            .push(response(URL, 200, &[], r#"{"status":"Job is NOT ready"}"#))
            .push(response(URL, 200, &[], r#"{"status":"Job is ready","result":"x"}"#));

        let start = Instant::now();
        poller.run().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_submit_without_token_is_protocol_violation() {
        let (client, poller) = poller(Duration::from_secs(30));
        client.push(response(URL, 200, &[], r#"{"seconds":3}"#));

        let err = poller.submit().await.unwrap_err();
        assert!(matches!(err, HarnessError::ProtocolViolation { .. }));
    }

    #[tokio::test]
    async fn test_submit_without_seconds_is_protocol_violation() {
        let (client, poller) = poller(Duration::from_secs(30));
        client.push(response(URL, 200, &[], r#"{"token":"abc"}"#));

        let err = poller.submit().await.unwrap_err();
        assert!(err.to_string().contains("seconds"));
    }
}
