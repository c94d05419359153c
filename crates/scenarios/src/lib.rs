//! Apiprobe Scenarios - Fixtures for the conformance suites
//!
//! The suites under `tests/` drive the LearnQA playground API through a
//! [`Harness`]. Suites that talk to the real server are `#[ignore]`d and run
//! with `cargo test -- --ignored`; the offline suite runs against a local
//! `wiremock` double.

pub mod accounts;
pub mod harness;
pub mod messages;

pub use accounts::{FixedAccount, PROTECTED_IDS, is_protected};
pub use harness::{Harness, PROFILE_FIELDS, Profile, RegisteredUser};
