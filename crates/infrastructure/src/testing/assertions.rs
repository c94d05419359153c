//! Assertion functions.
//!
//! Each function checks one property of a response and returns the
//! mismatch on failure, so scenarios can chain checks with `?`.

use apiprobe_domain::{AssertionMismatch, ResponseSpec};
use serde_json::Value;

const PREVIEW_CHARS: usize = 100;

pub(crate) fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

fn mismatch(
    response: &ResponseSpec,
    assertion: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> AssertionMismatch {
    AssertionMismatch::new(response.url.clone(), assertion, expected, actual)
}

fn json_object<'a>(
    response: &'a ResponseSpec,
    assertion: &str,
    expected: impl Into<String>,
) -> Result<&'a serde_json::Map<String, Value>, AssertionMismatch> {
    response.json_object().ok_or_else(|| {
        mismatch(
            response,
            assertion,
            expected,
            format!("body is not a JSON object: {}", preview(&response.body)),
        )
    })
}

/// Status code equals `expected`.
///
/// # Errors
///
/// Returns the mismatch when the status differs.
pub fn assert_status(response: &ResponseSpec, expected: u16) -> Result<(), AssertionMismatch> {
    if response.status == expected {
        Ok(())
    } else {
        Err(mismatch(
            response,
            "status code",
            expected.to_string(),
            response.status.to_string(),
        ))
    }
}

/// Body equals `expected` exactly.
///
/// # Errors
///
/// Returns the mismatch when the body differs.
pub fn assert_body_equals(response: &ResponseSpec, expected: &str) -> Result<(), AssertionMismatch> {
    if response.body == expected {
        Ok(())
    } else {
        Err(mismatch(response, "body", expected, response.body.clone()))
    }
}

/// Top-level JSON field `name` is present.
///
/// # Errors
///
/// Returns the mismatch when the field is absent or the body is not a JSON
/// object.
pub fn assert_has_field(response: &ResponseSpec, name: &str) -> Result<(), AssertionMismatch> {
    let assertion = format!("JSON field '{name}'");
    let object = json_object(response, &assertion, "present")?;
    if object.contains_key(name) {
        Ok(())
    } else {
        Err(mismatch(
            response,
            assertion,
            "present",
            format!("absent in {}", preview(&response.body)),
        ))
    }
}

/// Top-level JSON field `name` is absent.
///
/// # Errors
///
/// Returns the mismatch when the field is present or the body is not a JSON
/// object.
pub fn assert_missing_field(response: &ResponseSpec, name: &str) -> Result<(), AssertionMismatch> {
    let assertion = format!("JSON field '{name}'");
    let object = json_object(response, &assertion, "absent")?;
    match object.get(name) {
        None => Ok(()),
        Some(value) => Err(mismatch(
            response,
            assertion,
            "absent",
            format!("present with value {value}"),
        )),
    }
}

/// Every field in `names` is present; the first missing one fails.
///
/// # Errors
///
/// Returns the mismatch for the first absent field.
pub fn assert_has_fields<I, S>(response: &ResponseSpec, names: I) -> Result<(), AssertionMismatch>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .try_for_each(|name| assert_has_field(response, name.as_ref()))
}

/// Every field in `names` is absent; the first present one fails.
///
/// # Errors
///
/// Returns the mismatch for the first present field.
pub fn assert_missing_fields<I, S>(
    response: &ResponseSpec,
    names: I,
) -> Result<(), AssertionMismatch>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .try_for_each(|name| assert_missing_field(response, name.as_ref()))
}

/// Top-level JSON field `name` is present and equals `expected`.
///
/// Numbers compare numerically, and an expected number also matches a
/// numeric string. Everything else compares structurally.
///
/// # Errors
///
/// Returns the mismatch when the field is absent or differs.
pub fn assert_field_equals(
    response: &ResponseSpec,
    name: &str,
    expected: impl Into<Value>,
) -> Result<(), AssertionMismatch> {
    let expected = expected.into();
    let assertion = format!("JSON field '{name}'");
    let object = json_object(response, &assertion, expected.to_string())?;
    match object.get(name) {
        None => Err(mismatch(response, assertion, expected.to_string(), "absent")),
        Some(actual) if json_values_equal(actual, &expected) => Ok(()),
        Some(actual) => Err(mismatch(
            response,
            assertion,
            expected.to_string(),
            actual.to_string(),
        )),
    }
}

/// Header `name` is present and, when given, equals `value`.
///
/// # Errors
///
/// Returns the mismatch when the header is absent or differs.
pub fn assert_header(
    response: &ResponseSpec,
    name: &str,
    value: Option<&str>,
) -> Result<(), AssertionMismatch> {
    let assertion = format!("header '{name}'");
    let expected = value.map_or_else(|| "present".to_string(), str::to_string);
    match (response.header(name), value) {
        (None, _) => Err(mismatch(response, assertion, expected, "absent")),
        (Some(actual), Some(wanted)) if actual != wanted => {
            Err(mismatch(response, assertion, expected, actual))
        }
        (Some(_), _) => Ok(()),
    }
}

/// Cookie `name` was set and, when given, has `value`.
///
/// # Errors
///
/// Returns the mismatch when the cookie is absent or differs.
pub fn assert_cookie(
    response: &ResponseSpec,
    name: &str,
    value: Option<&str>,
) -> Result<(), AssertionMismatch> {
    let assertion = format!("cookie '{name}'");
    let expected = value.map_or_else(|| "present".to_string(), str::to_string);
    match (response.cookie(name), value) {
        (None, _) => Err(mismatch(response, assertion, expected, "absent")),
        (Some(actual), Some(wanted)) if actual != wanted => {
            Err(mismatch(response, assertion, expected, actual))
        }
        (Some(_), _) => Ok(()),
    }
}

/// Compares an actual JSON value against an expected one.
#[must_use]
pub fn json_values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::Number(b)) => a
            .trim()
            .parse::<serde_json::Number>()
            .is_ok_and(|a| numbers_equal(&a, b)),
        _ => actual == expected,
    }
}

/// Integers compare exactly; only when either side is fractional does the
/// comparison go through `f64`.
#[allow(clippy::float_cmp)]
fn numbers_equal(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    if (a.is_i64() || a.is_u64()) && (b.is_i64() || b.is_u64()) {
        // One side negative, the other above i64::MAX.
        return false;
    }
    a.as_f64()
        .zip(b.as_f64())
        .map_or(a == b, |(x, y)| x == y)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use apiprobe_domain::Headers;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    const URL: &str = "https://playground.learnqa.ru/api/user/2";

    fn response(status: u16, headers: &[(&str, &str)], body: &str) -> ResponseSpec {
        ResponseSpec::new(
            URL,
            status,
            headers.iter().copied().collect::<Headers>(),
            body,
            Duration::from_millis(3),
        )
    }

    #[test]
    fn test_status() {
        let resp = response(404, &[], "User not found");
        assert!(assert_status(&resp, 404).is_ok());

        let err = assert_status(&resp, 200).unwrap_err();
        assert_eq!(err.url, URL);
        assert_eq!(err.expected, "200");
        assert_eq!(err.actual, "404");
    }

    #[test]
    fn test_body_equals_is_exact() {
        let resp = response(400, &[], "Invalid email format");
        assert!(assert_body_equals(&resp, "Invalid email format").is_ok());
        assert!(assert_body_equals(&resp, "Invalid email format ").is_err());
    }

    #[test]
    fn test_unauthenticated_user_has_username_only() {
        let resp = response(200, &[], r#"{"username":"Vitaliy"}"#);
        assert!(assert_has_field(&resp, "username").is_ok());
        assert!(assert_missing_fields(&resp, ["email", "firstName", "lastName"]).is_ok());

        let err = assert_has_fields(&resp, ["username", "email", "firstName"]).unwrap_err();
        assert_eq!(err.assertion, "JSON field 'email'");
    }

    #[test]
    fn test_missing_field_reports_value() {
        let resp = response(200, &[], r#"{"id":"2","email":"vinkotov@example.com"}"#);
        let err = assert_missing_field(&resp, "email").unwrap_err();
        assert_eq!(err.actual, r#"present with value "vinkotov@example.com""#);
    }

    #[test]
    fn test_field_checks_on_plain_text_body() {
        let resp = response(400, &[], "Auth token not supplied");
        let err = assert_has_field(&resp, "id").unwrap_err();
        assert!(err.actual.contains("not a JSON object"));
        assert!(assert_missing_field(&resp, "id").is_err());
    }

    #[test]
    fn test_field_equals_numeric_string() {
        let resp = response(200, &[], r#"{"id":"46754","user_id":2}"#);
        assert!(assert_field_equals(&resp, "id", 46754).is_ok());
        assert!(assert_field_equals(&resp, "id", "46754").is_ok());
        assert!(assert_field_equals(&resp, "user_id", 2).is_ok());
        assert!(assert_field_equals(&resp, "user_id", json!(2.0)).is_ok());

        let err = assert_field_equals(&resp, "user_id", 3).unwrap_err();
        assert_eq!((err.expected.as_str(), err.actual.as_str()), ("3", "2"));

        // a number never matches an expected string
        assert!(assert_field_equals(&resp, "user_id", "2").is_err());
    }

    #[test]
    fn test_field_equals_absent() {
        let resp = response(200, &[], r#"{"error":"Too short value for field firstName"}"#);
        assert!(
            assert_field_equals(&resp, "error", "Too short value for field firstName").is_ok()
        );
        let err = assert_field_equals(&resp, "firstName", "x").unwrap_err();
        assert_eq!(err.actual, "absent");
    }

    #[test]
    fn test_header_and_cookie() {
        let resp = response(
            200,
            &[
                ("x-secret-homework-header", "Some secret value"),
                ("Set-Cookie", "HomeWork=hw_value; path=/"),
            ],
            "",
        );
        assert!(assert_header(&resp, "X-Secret-Homework-Header", Some("Some secret value")).is_ok());
        assert!(assert_header(&resp, "x-secret-homework-header", None).is_ok());
        assert!(assert_header(&resp, "x-other", None).is_err());
        assert!(assert_cookie(&resp, "HomeWork", Some("hw_value")).is_ok());

        let err = assert_cookie(&resp, "HomeWork", Some("other")).unwrap_err();
        assert_eq!(err.actual, "hw_value");
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let max = json!(u64::MAX);
        assert!(json_values_equal(&max, &json!(18_446_744_073_709_551_615_u64)));
        assert!(!json_values_equal(&max, &json!(18_446_744_073_709_551_614_u64)));
        assert!(!json_values_equal(&json!(-1), &max));
        assert!(json_values_equal(&json!("18446744073709551615"), &max));
        assert!(!json_values_equal(&json!("18446744073709551614"), &max));
        assert!(json_values_equal(&json!(1.5), &json!(1.5)));
        assert!(!json_values_equal(&json!(0.1 + 0.2), &json!(0.3)));
        assert!(json_values_equal(&json!(2), &json!(2.0)));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let body = "é".repeat(150);
        let p = preview(&body);
        assert_eq!(p.chars().count(), 103);
        assert!(p.ends_with("..."));
    }
}
