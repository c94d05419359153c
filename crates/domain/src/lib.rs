//! Apiprobe Domain - Core types of the API conformance harness
//!
//! This crate defines what the harness sends, receives and checks:
//! request and response descriptions, sessions, registration payloads,
//! async job state, redirect traces and assertions.
//! All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod cookie;
pub mod diagnostics;
pub mod error;
pub mod id;
pub mod job;
pub mod redirect;
pub mod registration;
pub mod request;
pub mod response;
pub mod session;
pub mod testing;

pub use config::{HarnessConfig, PayloadEncoding};
pub use cookie::{Cookie, Cookies};
pub use diagnostics::{HomeworkMessage, JsonHomework, UserAgentVerdict};
pub use error::{DomainError, DomainResult};
pub use id::generate_scenario_id;
pub use job::{AsyncJobState, JobPhase, JobStatus};
pub use redirect::{RedirectHop, RedirectTrace};
pub use registration::{
    FieldOverride, Overrides, RegistrationField, RegistrationPayload, UserUpdate,
};
pub use request::{
    Header, Headers, HttpMethod, QueryParam, QueryParams, RequestBody, RequestSpec,
};
pub use response::ResponseSpec;
pub use session::{AuthMaterials, Credentials, Session, SessionKeys, SessionStatus};
pub use testing::{
    Assertion, AssertionMismatch, AssertionResult, ComparisonOperator, StatusExpectation,
    TestResults, TestSuite,
};
