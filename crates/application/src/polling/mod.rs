//! Polling and retry controllers.
//!
//! Both controllers drive a sequence of requests whose next step depends
//! on the previous response: an async job polled by token, and a redirect
//! chain walked one hop at a time.

mod job;
mod redirect;

pub use job::{JOB_PATH, JobPoller};
pub use redirect::{LONG_REDIRECT_PATH, RedirectFollower};
