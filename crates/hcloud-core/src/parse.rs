//! Conversion of decoded JSON into typed resources.
//!
//! Collections tolerate `null` entries: a null slot is dropped rather than turned
//! into a placeholder or rejected, so a deleted or hidden resource shows up as a
//! gap in the list. The same policy applies to nested id lists via
//! [`deserialize_skip_nulls`].

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a single resource.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if the value does not match the resource shape.
pub fn parse_one<R>(value: Value) -> Result<R>
where
    R: DeserializeOwned,
{
    serde_json::from_value(value).map_err(|err| Error::ParseError(err.to_string()))
}

/// Parse a collection of resources, dropping `null` entries and keeping order.
///
/// A `null` collection parses as empty.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if the value is neither an array nor `null`, or
/// if any non-null entry does not match the resource shape.
pub fn parse_many<R>(value: Value) -> Result<Vec<R>>
where
    R: DeserializeOwned,
{
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(parse_one::<R>)
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::ParseError(format!(
            "expected an array of resources, found {}",
            kind(&other)
        ))),
    }
}

/// Deserialize an optional list, dropping `null` entries.
///
/// A missing or `null` list deserializes as empty.
pub fn deserialize_skip_nulls<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
