//! Request-body validation for snippet creation.
//!
//! Every field is checked, and all violations are reported together so the
//! client can fix the whole request in one round trip.

use crate::constants::{CODE_MAX_CHARS, TITLE_MAX_CHARS};
use crate::models::snippet::{Language, NewSnippet};
use serde::Serialize;
use serde_json::Value;

const INVALID_VALUE_MSG: &str = "Invalid value";

/// One rejected field in a create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: Value,
    pub msg: &'static str,
    pub path: &'static str,
    pub location: &'static str,
}

impl FieldViolation {
    fn body_field(path: &'static str, value: Value) -> Self {
        Self {
            kind: "field",
            value,
            msg: INVALID_VALUE_MSG,
            path,
            location: "body",
        }
    }
}

/// Read a body field as text.
///
/// Scalars are stringified, absent and `null` fields read as empty. Arrays and
/// objects cannot be coerced and are handed back as the error value.
fn field_text(body: &Value, name: &str) -> Result<String, Value> {
    match body.get(name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(Value::Bool(flag)) => Ok(flag.to_string()),
        Some(other) => Err(other.clone()),
    }
}

/// Check that `text` holds between 1 and `max_chars` characters.
pub fn char_len_within(text: &str, max_chars: usize) -> bool {
    let len = text.chars().count();
    (1..=max_chars).contains(&len)
}

/// Escape HTML-significant characters in `input`.
///
/// Covers `& < > " ' / \` and backtick, so the result is inert in both element
/// and attribute context.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn trimmed_field(
    body: &Value,
    path: &'static str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match field_text(body, path) {
        Ok(text) => Some(text.trim().to_string()),
        Err(raw) => {
            violations.push(FieldViolation::body_field(path, raw));
            None
        }
    }
}

fn bounded_field(
    body: &Value,
    path: &'static str,
    max_chars: usize,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    let text = trimmed_field(body, path, violations)?;
    if char_len_within(&text, max_chars) {
        Some(text)
    } else {
        violations.push(FieldViolation::body_field(path, Value::String(text)));
        None
    }
}

/// Validate and normalize a snippet creation body.
///
/// `title` and `code` are trimmed and length-checked, and `title` is then
/// HTML-escaped. `language` is trimmed and must exactly match one of the
/// accepted names.
///
/// # Returns
/// The normalized [`NewSnippet`] when every field is valid.
///
/// # Errors
/// Returns every field violation found, in `title`, `code`, `language` order.
pub fn validate_create_request(body: &Value) -> Result<NewSnippet, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let title = bounded_field(body, "title", TITLE_MAX_CHARS, &mut violations).map(|t| escape_html(&t));
    let code = bounded_field(body, "code", CODE_MAX_CHARS, &mut violations);
    let language = trimmed_field(body, "language", &mut violations).and_then(|name| {
        let parsed = Language::from_name(&name);
        if parsed.is_none() {
            violations.push(FieldViolation::body_field("language", Value::String(name)));
        }
        parsed
    });

    match (title, code, language) {
        (Some(title), Some(code), Some(language)) if violations.is_empty() => Ok(NewSnippet {
            title,
            code,
            language,
        }),
        _ => Err(violations),
    }
}
