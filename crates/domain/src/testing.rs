//! Response assertions.
//!
//! This module provides the declarative model for checking HTTP responses:
//! what to check ([`Assertion`]), how a failed check is reported
//! ([`AssertionMismatch`]) and how checks are grouped ([`TestSuite`]).
//! Execution lives in the infrastructure test runner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A check to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check the whole body equals a text exactly.
    BodyEquals {
        /// Expected body content.
        expected: String,
    },
    /// Check body contains text.
    BodyContains {
        /// Text to search for.
        text: String,
        /// Case-insensitive search.
        #[serde(default)]
        ignore_case: bool,
    },
    /// Check body matches regex pattern.
    BodyMatches {
        /// Regex pattern.
        pattern: String,
    },
    /// Check a top-level JSON field is present.
    FieldExists {
        /// Field name.
        name: String,
    },
    /// Check a top-level JSON field is absent.
    FieldMissing {
        /// Field name.
        name: String,
    },
    /// Check a top-level JSON field is present and equals a value.
    FieldEquals {
        /// Field name.
        name: String,
        /// Expected value; numbers compare numerically.
        expected: serde_json::Value,
    },
    /// Check header exists and optionally its value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        value: Option<String>,
    },
    /// Check header value matches pattern.
    HeaderMatches {
        /// Header name.
        name: String,
        /// Regex pattern to match.
        pattern: String,
    },
    /// Check a cookie was set and optionally its value.
    CookieExists {
        /// Cookie name.
        name: String,
        /// Optional expected value.
        value: Option<String>,
    },
    /// Check body is valid JSON.
    IsJson,
    /// Check body length.
    BodyLength {
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Length to compare against.
        length: usize,
    },
}

impl Assertion {
    /// Status equals `code`.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Body equals `text`.
    #[must_use]
    pub fn body_equals(text: impl Into<String>) -> Self {
        Self::BodyEquals {
            expected: text.into(),
        }
    }

    /// JSON field `name` is present.
    #[must_use]
    pub fn has_field(name: impl Into<String>) -> Self {
        Self::FieldExists { name: name.into() }
    }

    /// JSON field `name` is absent.
    #[must_use]
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::FieldMissing { name: name.into() }
    }

    /// JSON field `name` equals `expected`.
    #[must_use]
    pub fn field_equals(name: impl Into<String>, expected: impl Into<serde_json::Value>) -> Self {
        Self::FieldEquals {
            name: name.into(),
            expected: expected.into(),
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("status code {}", expected.description()),
            Self::BodyEquals { .. } => "body equals expected text".to_string(),
            Self::BodyContains { text, .. } => format!("body contains '{text}'"),
            Self::BodyMatches { pattern } => format!("body matches /{pattern}/"),
            Self::FieldExists { name } => format!("JSON field '{name}' exists"),
            Self::FieldMissing { name } => format!("JSON field '{name}' is absent"),
            Self::FieldEquals { name, expected } => {
                format!("JSON field '{name}' equals {expected}")
            }
            Self::HeaderExists {
                name,
                value: Some(v),
            } => format!("header '{name}' equals '{v}'"),
            Self::HeaderExists { name, value: None } => format!("header '{name}' exists"),
            Self::HeaderMatches { name, pattern } => {
                format!("header '{name}' matches /{pattern}/")
            }
            Self::CookieExists {
                name,
                value: Some(v),
            } => format!("cookie '{name}' equals '{v}'"),
            Self::CookieExists { name, value: None } => format!("cookie '{name}' exists"),
            Self::IsJson => "body is valid JSON".to_string(),
            Self::BodyLength { operator, length } => {
                format!("body length {} {length}", operator.symbol())
            }
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Comparison operators for length assertions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// Equal to.
    Equals,
    /// Not equal to.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal to.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal to.
    LessThanOrEqual,
}

impl ComparisonOperator {
    /// Get the symbol for this operator.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
        }
    }

    /// Applies the operator to `actual` and `expected`.
    #[must_use]
    pub fn compare<T: PartialOrd>(&self, actual: &T, expected: &T) -> bool {
        match self {
            Self::Equals => actual == expected,
            Self::NotEquals => actual != expected,
            Self::GreaterThan => actual > expected,
            Self::GreaterThanOrEqual => actual >= expected,
            Self::LessThan => actual < expected,
            Self::LessThanOrEqual => actual <= expected,
        }
    }
}

/// A failed assertion, with everything needed to reproduce it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("assertion failed for {url}: {assertion}\n  expected: {expected}\n  actual:   {actual}")]
pub struct AssertionMismatch {
    /// URL of the response that was checked.
    pub url: String,
    /// What was checked.
    pub assertion: String,
    /// Expected value.
    pub expected: String,
    /// Actual value found.
    pub actual: String,
}

impl AssertionMismatch {
    /// Create a mismatch report.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        assertion: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            assertion: assertion.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Failure details, if the assertion failed.
    pub mismatch: Option<AssertionMismatch>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            actual: None,
            mismatch: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            actual: Some(actual.into()),
            mismatch: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, mismatch: AssertionMismatch) -> Self {
        Self {
            assertion,
            actual: Some(mismatch.actual.clone()),
            mismatch: Some(mismatch),
        }
    }

    /// Whether the assertion passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.mismatch.is_none()
    }

    /// Converts into `Ok(())` or the mismatch.
    ///
    /// # Errors
    ///
    /// Returns the mismatch when the assertion failed.
    pub fn into_result(self) -> Result<(), AssertionMismatch> {
        self.mismatch.map_or(Ok(()), Err)
    }
}

/// A named group of assertions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TestSuite {
    /// Test suite name.
    pub name: String,
    /// Assertions to run.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
        }
    }

    /// Add an assertion to the suite.
    pub fn add(&mut self, assertion: Assertion) {
        self.assertions.push(assertion);
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Get the number of assertions.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResults {
    /// Test suite that was run.
    pub suite_name: String,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Number of assertions run.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(suite_name: impl Into<String>, results: Vec<AssertionResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed()).count();

        Self {
            suite_name: suite_name.into(),
            results,
            total,
            passed,
            failed: total - passed,
        }
    }

    /// Check if all tests passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// The first failure, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&AssertionMismatch> {
        self.results.iter().find_map(|r| r.mismatch.as_ref())
    }
}
