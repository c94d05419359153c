//! Test runner implementation.
//!
//! Executes declarative assertions against responses and produces test
//! results.

use apiprobe_domain::{
    Assertion, AssertionMismatch, AssertionResult, ComparisonOperator, ResponseSpec,
    StatusExpectation, TestResults, TestSuite,
};
use regex::Regex;
use tracing::debug;

use super::assertions::{
    assert_body_equals, assert_cookie, assert_field_equals, assert_has_field, assert_header,
    assert_missing_field, preview,
};

/// Test runner that executes assertions against responses.
#[derive(Debug, Default)]
pub struct TestRunner {
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Run a test suite against a response.
    #[must_use]
    pub fn run(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let mut results = Vec::with_capacity(suite.assertions.len());

        for assertion in &suite.assertions {
            let result = Self::run_assertion(assertion, response);
            let failed = !result.passed();
            results.push(result);

            if failed && self.stop_on_failure {
                break;
            }
        }

        let results = TestResults::new(&suite.name, results);
        debug!(
            suite = %suite.name,
            url = %response.url,
            passed = results.passed,
            failed = results.failed,
            "suite finished"
        );
        results
    }

    /// Runs `suite` and returns its first failure, if any.
    ///
    /// # Errors
    ///
    /// Returns the mismatch of the first failing assertion.
    pub fn verify(suite: &TestSuite, response: &ResponseSpec) -> Result<(), AssertionMismatch> {
        suite
            .assertions
            .iter()
            .try_for_each(|assertion| Self::run_assertion(assertion, response).into_result())
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match Self::check(assertion, response) {
            Ok(Some(actual)) => AssertionResult::pass_with_value(assertion.clone(), actual),
            Ok(None) => AssertionResult::pass(assertion.clone()),
            Err(mismatch) => AssertionResult::fail(assertion.clone(), mismatch),
        }
    }

    fn check(
        assertion: &Assertion,
        response: &ResponseSpec,
    ) -> Result<Option<String>, AssertionMismatch> {
        match assertion {
            Assertion::StatusCode { expected } => {
                check_status_code(assertion, response, expected).map(Some)
            }
            Assertion::BodyEquals { expected } => {
                assert_body_equals(response, expected).map(|()| None)
            }
            Assertion::BodyContains { text, ignore_case } => {
                check_body_contains(assertion, response, text, *ignore_case).map(|()| None)
            }
            Assertion::BodyMatches { pattern } => {
                check_body_matches(assertion, response, pattern).map(|()| None)
            }
            Assertion::FieldExists { name } => assert_has_field(response, name)
                .map(|()| response.field(name).map(ToString::to_string)),
            Assertion::FieldMissing { name } => {
                assert_missing_field(response, name).map(|()| None)
            }
            Assertion::FieldEquals { name, expected } => {
                assert_field_equals(response, name, expected.clone())
                    .map(|()| response.field(name).map(ToString::to_string))
            }
            Assertion::HeaderExists { name, value } => assert_header(response, name, value.as_deref())
                .map(|()| response.header(name).map(str::to_string)),
            Assertion::HeaderMatches { name, pattern } => {
                check_header_matches(assertion, response, name, pattern).map(Some)
            }
            Assertion::CookieExists { name, value } => assert_cookie(response, name, value.as_deref())
                .map(|()| response.cookie(name).map(str::to_string)),
            Assertion::IsJson => check_is_json(assertion, response).map(|()| None),
            Assertion::BodyLength { operator, length } => {
                check_body_length(assertion, response, *operator, *length).map(Some)
            }
        }
    }
}

fn fail(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> AssertionMismatch {
    AssertionMismatch::new(
        response.url.clone(),
        assertion.description(),
        expected,
        actual,
    )
}

fn compile(
    assertion: &Assertion,
    response: &ResponseSpec,
    pattern: &str,
) -> Result<Regex, AssertionMismatch> {
    Regex::new(pattern)
        .map_err(|e| fail(assertion, response, format!("/{pattern}/"), format!("invalid regex: {e}")))
}

fn check_status_code(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &StatusExpectation,
) -> Result<String, AssertionMismatch> {
    let actual = response.status.to_string();
    if expected.matches(response.status) {
        Ok(actual)
    } else {
        Err(fail(assertion, response, expected.description(), actual))
    }
}

fn check_body_contains(
    assertion: &Assertion,
    response: &ResponseSpec,
    text: &str,
    ignore_case: bool,
) -> Result<(), AssertionMismatch> {
    let body = &response.body;
    let contains = if ignore_case {
        body.to_lowercase().contains(&text.to_lowercase())
    } else {
        body.contains(text)
    };

    if contains {
        Ok(())
    } else {
        Err(fail(
            assertion,
            response,
            format!("contains '{text}'"),
            preview(body),
        ))
    }
}

fn check_body_matches(
    assertion: &Assertion,
    response: &ResponseSpec,
    pattern: &str,
) -> Result<(), AssertionMismatch> {
    let regex = compile(assertion, response, pattern)?;
    if regex.is_match(&response.body) {
        Ok(())
    } else {
        Err(fail(
            assertion,
            response,
            format!("/{pattern}/"),
            preview(&response.body),
        ))
    }
}

fn check_header_matches(
    assertion: &Assertion,
    response: &ResponseSpec,
    name: &str,
    pattern: &str,
) -> Result<String, AssertionMismatch> {
    let regex = compile(assertion, response, pattern)?;
    match response.header(name) {
        Some(actual) if regex.is_match(actual) => Ok(actual.to_string()),
        Some(actual) => Err(fail(assertion, response, format!("/{pattern}/"), actual)),
        None => Err(fail(assertion, response, format!("/{pattern}/"), "absent")),
    }
}

fn check_is_json(assertion: &Assertion, response: &ResponseSpec) -> Result<(), AssertionMismatch> {
    if response.json.is_some() {
        Ok(())
    } else {
        Err(fail(assertion, response, "valid JSON", preview(&response.body)))
    }
}

fn check_body_length(
    assertion: &Assertion,
    response: &ResponseSpec,
    operator: ComparisonOperator,
    length: usize,
) -> Result<String, AssertionMismatch> {
    let actual = response.body.len();
    if operator.compare(&actual, &length) {
        Ok(actual.to_string())
    } else {
        Err(fail(
            assertion,
            response,
            format!("{} {length}", operator.symbol()),
            actual.to_string(),
        ))
    }
}
