//! Apiprobe Application - Harness logic above the HTTP port
//!
//! This crate holds everything that drives the remote API without knowing
//! how bytes reach it: the [`ports::HttpClient`] port, randomized test data,
//! session handling, the endpoint actions and the polling controllers.

pub mod actions;
pub mod error;
pub mod generator;
pub mod polling;
pub mod ports;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use actions::{PlaygroundApi, UserApi};
pub use error::{HarnessError, HarnessResult};
pub use generator::DataGenerator;
pub use polling::{JobPoller, RedirectFollower};
pub use ports::{Clock, HttpClient, TransportError};
pub use session::SessionManager;
