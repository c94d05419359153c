//! In-memory doubles for the ports.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use apiprobe_domain::{Headers, RequestSpec, ResponseSpec};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::ports::{Clock, HttpClient, TransportError};

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<ResponseSpec, TransportError>>>,
    requests: Mutex<Vec<RequestSpec>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ResponseSpec) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: TransportError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn send(&self, request: &RequestSpec) -> Result<ResponseSpec, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left")
    }
}

/// A clock stuck at one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds a response the way the adapter would.
pub fn response(url: &str, status: u16, headers: &[(&str, &str)], body: &str) -> ResponseSpec {
    ResponseSpec::new(
        url,
        status,
        headers.iter().copied().collect::<Headers>(),
        body,
        Duration::from_millis(5),
    )
}
