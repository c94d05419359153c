//! Apiprobe Infrastructure - Adapters and implementations
//!
//! This crate provides the concrete pieces behind the application ports
//! (the reqwest HTTP adapter, the system clock), configuration loading,
//! tracing setup and the response assertion engine.

pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod testing;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::{ConfigError, ConfigSources, load_config, load_config_from};
pub use telemetry::init_tracing;
pub use testing::{
    TestRunner, assert_body_equals, assert_cookie, assert_field_equals, assert_has_field,
    assert_has_fields, assert_header, assert_missing_field, assert_missing_fields, assert_status,
};
