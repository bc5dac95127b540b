//! Argument checks applied before any value reaches a generated script.
//!
//! Every public operation runs its ids, labels, and property values through
//! these functions first. A rejected value fails the operation with
//! [`GraphError::InvalidArgument`] and nothing is submitted.

use serde_json::{Map, Value};

use crate::client::{GraphError, Result};

/// Characters that could close or re-open a script string literal, start an
/// escape sequence, or terminate a statement.
const FORBIDDEN: &[char] = &['\'', '"', '`', '\\', ';'];

fn invalid(field: &str, reason: impl Into<String>) -> GraphError {
    GraphError::InvalidArgument {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Reject text containing quoting, escape, or terminator characters, or any
/// control character.
pub fn ensure_safe(field: &str, value: &str) -> Result<()> {
    match value
        .chars()
        .find(|c| FORBIDDEN.contains(c) || c.is_control())
    {
        Some(c) => Err(invalid(
            field,
            format!("contains forbidden character {c:?}"),
        )),
        None => Ok(()),
    }
}

/// Ids and labels: non-empty and safe.
pub fn ensure_identifier(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    ensure_safe(field, value)
}

pub fn ensure_safe_all<S: AsRef<str>>(field: &str, values: &[S]) -> Result<()> {
    values
        .iter()
        .try_for_each(|v| ensure_identifier(field, v.as_ref()))
}

/// Walk a JSON value; every string leaf and object key must be safe.
pub fn ensure_safe_value(field: &str, value: &Value) -> Result<()> {
    match value {
        Value::String(s) => ensure_safe(field, s),
        Value::Array(items) => items.iter().try_for_each(|v| ensure_safe_value(field, v)),
        Value::Object(map) => ensure_safe_properties(field, map),
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(()),
    }
}

/// A flat property map: keys are identifiers, values are checked recursively.
pub fn ensure_safe_properties(field: &str, properties: &Map<String, Value>) -> Result<()> {
    for (key, value) in properties {
        let path = format!("{field}.{key}");
        ensure_identifier(&path, key)?;
        ensure_safe_value(&path, value)?;
    }
    Ok(())
}
