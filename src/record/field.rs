// Lenient field deserializers shared by every record type.
//
// Upstream exports mix strings and numbers for the same column, and use empty
// strings and nulls interchangeably for "absent".

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use crate::domain::Key;

/// Reads an optional scalar as trimmed text.
///
/// Numbers and booleans are stringified; null and blank strings become `None`.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar value, found {}",
            value_kind(&other)
        ))),
    }
}

/// Reads an optional business key. Absent or blank values become `None`.
pub fn key<'de, D>(deserializer: D) -> Result<Option<Key>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.and_then(|s| Key::new(s).ok()))
}

/// Short description of a JSON value's type, for error messages.
pub const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
