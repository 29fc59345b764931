//! Field rules for candidate records.
//!
//! A collection declares its rules as a table of [`Rule`]s; [`validate`]
//! runs every rule and collects all violations in table order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_!#$%&'*+/=?`{|}~^.-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+$";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"));

pub type Check = fn(Option<&Value>) -> bool;

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(field: &'static str, check: Check, message: &'static str) -> Self {
        Self { field, check, message }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

pub fn validate(candidate: &Map<String, Value>, rules: &[Rule]) -> Result<(), Vec<Violation>> {
    let violations: Vec<Violation> = rules
        .iter()
        .filter(|rule| !(rule.check)(candidate.get(rule.field)))
        .map(|rule| Violation::new(rule.field, rule.message))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validates a raw request body, which must be a JSON object.
pub fn validate_body<'a>(body: &'a Value, rules: &[Rule]) -> Result<&'a Map<String, Value>, Vec<Violation>> {
    let candidate = body
        .as_object()
        .ok_or_else(|| vec![Violation::new("body", "Request body must be a JSON object")])?;
    validate(candidate, rules)?;
    Ok(candidate)
}

/// Non-empty after trimming.
pub fn non_blank(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty())
}

pub fn non_empty(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}

/// Exactly `true` or `false`; strings and numbers are rejected.
pub fn is_boolean(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(_)))
}

pub fn positive_integer(value: Option<&Value>) -> bool {
    value.and_then(Value::as_i64).is_some_and(|n| n > 0)
}

pub fn is_email(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| EMAIL_RE.is_match(s))
}
