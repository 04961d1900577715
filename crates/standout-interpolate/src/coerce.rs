//! Turning substituted strings back into structured values.
//!
//! Two stages run on every fully substituted string leaf:
//!
//! - [`coerce`] parses the whole string as JSON when `parse_strings` is on. A
//!   bare number is only accepted if it is a safe integer (or big numbers were
//!   allowed), so `"9007199254740993"` stays a string rather than silently
//!   becoming a number other consumers can't represent.
//! - [`reparse_composite`] runs regardless of `parse_strings`, but only on
//!   strings whose trimmed text is bracketed like an object or array.
//!
//! Both go through [`parse_json`], which refuses documents carrying keys that
//! would reach an object prototype in a JavaScript consumer.

use serde_json::{Map, Value};

use crate::error::JsonError;

/// Largest integer every IEEE-754 double consumer can represent exactly.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Parses JSON, rejecting prototype-reaching keys.
///
/// Refused keys are `__proto__` anywhere, and `constructor` when its value is
/// an object that has a `prototype` key.
///
/// ```rust
/// use standout_interpolate::coerce::parse_json;
///
/// assert!(parse_json(r#"{"k": 1}"#).is_ok());
/// assert!(parse_json(r#"{"__proto__": {"admin": true}}"#).is_err());
/// ```
pub fn parse_json(text: &str) -> Result<Value, JsonError> {
    let value: Value = serde_json::from_str(text)?;
    reject_forbidden_keys(&value)?;
    Ok(value)
}

fn reject_forbidden_keys(value: &Value) -> Result<(), JsonError> {
    match value {
        Value::Object(map) => {
            check_map(map)?;
            map.values().try_for_each(reject_forbidden_keys)
        }
        Value::Array(items) => items.iter().try_for_each(reject_forbidden_keys),
        _ => Ok(()),
    }
}

fn check_map(map: &Map<String, Value>) -> Result<(), JsonError> {
    if map.contains_key("__proto__") {
        return Err(JsonError::ForbiddenKey("__proto__".to_string()));
    }
    if let Some(Value::Object(ctor)) = map.get("constructor") {
        if ctor.contains_key("prototype") {
            return Err(JsonError::ForbiddenKey("constructor.prototype".to_string()));
        }
    }
    Ok(())
}

/// Whether a JSON number is an integer within ±[`MAX_SAFE_INTEGER`].
pub fn is_safe_integer(value: &Value) -> bool {
    let Value::Number(n) = value else {
        return false;
    };

    if let Some(i) = n.as_i64() {
        return i.unsigned_abs() <= MAX_SAFE_INTEGER;
    }
    if let Some(u) = n.as_u64() {
        return u <= MAX_SAFE_INTEGER;
    }
    match n.as_f64() {
        Some(f) => f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER as f64,
        None => false,
    }
}

/// First coercion stage: reparse a substituted string as JSON.
///
/// Returns the parsed value when parsing is enabled, succeeds, and the result
/// is not a number outside the safe-integer range (unless `allow_big_numbers`).
/// Every other case yields the string unchanged.
pub fn coerce(text: String, parse_strings: bool, allow_big_numbers: bool) -> Value {
    if !parse_strings {
        return Value::String(text);
    }

    match parse_json(&text) {
        Ok(parsed) if !parsed.is_number() || allow_big_numbers || is_safe_integer(&parsed) => {
            parsed
        }
        Ok(_) => {
            tracing::trace!(text = %text, "keeping number outside safe-integer range as string");
            Value::String(text)
        }
        Err(_) => Value::String(text),
    }
}

/// Second coercion stage: parse strings that look like a JSON object or array.
///
/// Non-strings and strings that fail to parse are returned unchanged.
pub fn reparse_composite(value: Value) -> Value {
    let Value::String(text) = value else {
        return value;
    };

    let trimmed = text.trim();
    let bracketed = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));

    if bracketed {
        if let Ok(parsed) = parse_json(trimmed) {
            return parsed;
        }
    }
    Value::String(text)
}
