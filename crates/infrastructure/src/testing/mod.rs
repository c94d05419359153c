//! Response assertion engine.
//!
//! Plain `assert_*` functions for imperative checks inside scenarios, and a
//! [`TestRunner`] that executes declarative suites.

mod assertions;
mod runner;

pub use assertions::{
    assert_body_equals, assert_cookie, assert_field_equals, assert_has_field, assert_has_fields,
    assert_header, assert_missing_field, assert_missing_fields, assert_status, json_values_equal,
};
pub use runner::TestRunner;
