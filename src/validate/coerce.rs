//! Field coercion rules

use serde_json::{Map, Value};

use super::ValidationError;

/// JSON integer, finite float (truncated toward zero), or integer string
pub fn coerce_i64(field: &str, value: &Value) -> Result<i64, ValidationError> {
    let wrong = || ValidationError::wrong_type(field, "integer", value);
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                let t = f.trunc();
                if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
                    Ok(t as i64)
                } else {
                    Err(wrong())
                }
            } else {
                // u64 above i64::MAX
                Err(wrong())
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| wrong()),
        _ => Err(wrong()),
    }
}

pub fn coerce_i32(field: &str, value: &Value) -> Result<i32, ValidationError> {
    let wide = coerce_i64(field, value)?;
    i32::try_from(wide).map_err(|_| ValidationError::wrong_type(field, "32-bit integer", value))
}

pub fn coerce_text(field: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ValidationError::wrong_type(field, "text", value)),
    }
}

/// JSON bool, or the strings "true"/"false" in any case
pub fn coerce_bool(field: &str, value: &Value) -> Result<bool, ValidationError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(ValidationError::wrong_type(field, "boolean", value)),
    }
}

pub fn coerce_text_list(field: &str, value: &Value) -> Result<Vec<String>, ValidationError> {
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::wrong_type(field, "list of text", value))?;
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(ValidationError::wrong_type(field, "list of text", other)),
        })
        .collect()
}

/// Required field lookup
pub fn required<'a>(map: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ValidationError> {
    map.get(field)
        .ok_or_else(|| ValidationError::MissingField(field.to_string()))
}

/// Optional integer: an absent key takes `default`, a present one must coerce
pub fn i32_or(map: &Map<String, Value>, field: &str, default: i32) -> Result<i32, ValidationError> {
    map.get(field).map_or(Ok(default), |v| coerce_i32(field, v))
}

pub fn i64_or(map: &Map<String, Value>, field: &str, default: i64) -> Result<i64, ValidationError> {
    map.get(field).map_or(Ok(default), |v| coerce_i64(field, v))
}
