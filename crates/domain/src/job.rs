//! Asynchronous job state.

use serde::{Deserialize, Serialize};

/// Status text the job endpoint returns while the job runs.
pub const NOT_READY_TEXT: &str = "Job is NOT ready";

/// Status text the job endpoint returns once the result is available.
pub const READY_TEXT: &str = "Job is ready";

/// Server-reported status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// The job is still running.
    NotReady,
    /// The job finished and its result is available.
    Ready,
    /// Not yet polled, or the server answered with something else.
    #[default]
    Unknown,
}

impl JobStatus {
    /// Classifies the `status` text of a poll response.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        // "Job is NOT ready" also contains "ready", so test it first.
        if text.contains(NOT_READY_TEXT) {
            Self::NotReady
        } else if text.contains(READY_TEXT) {
            Self::Ready
        } else {
            Self::Unknown
        }
    }
}

/// Phase of the polling controller for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    /// The job was created; no status check yet.
    Submitted,
    /// At least one status check happened.
    Polling,
    /// The controller is done; the last poll is final.
    Ready,
}

/// State of one asynchronous job.
///
/// Created from the submission response and updated only by polls that
/// use the same token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncJobState {
    /// Token identifying the job.
    pub token: String,
    /// Seconds the server said the job needs.
    pub remaining_seconds: u64,
    /// Last observed status.
    pub status: JobStatus,
    /// Raw status text from the last poll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    /// Result, once the job is ready.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Polling phase.
    pub phase: JobPhase,
    /// Number of status checks so far.
    pub polls: u32,
}

impl AsyncJobState {
    /// State right after submission.
    #[must_use]
    pub fn submitted(token: impl Into<String>, remaining_seconds: u64) -> Self {
        Self {
            token: token.into(),
            remaining_seconds,
            status: JobStatus::Unknown,
            status_text: None,
            result: None,
            phase: JobPhase::Submitted,
            polls: 0,
        }
    }

    /// Records the outcome of one poll.
    pub fn record_poll(&mut self, status_text: Option<String>, result: Option<String>) {
        self.status = status_text
            .as_deref()
            .map_or(JobStatus::Unknown, JobStatus::from_text);
        self.status_text = status_text;
        if result.is_some() {
            self.result = result;
        }
        self.polls += 1;
        self.phase = JobPhase::Polling;
    }

    /// Marks the controller as finished.
    pub const fn finish(&mut self) {
        self.phase = JobPhase::Ready;
    }

    /// Returns true once the controller has finished.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.phase, JobPhase::Ready)
    }
}
