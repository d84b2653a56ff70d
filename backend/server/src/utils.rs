use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::{database::DEFAULT_LIMIT, error::AppError};

/// JSON object from a request body. Anything malformed reads as an empty object, so validation
/// reports the first missing field instead of a parse error.
pub fn parse_body(bytes: &Bytes) -> Map<String, Value> {
    match serde_json::from_slice(bytes) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

pub fn is_missing(body: &Map<String, Value>, field: &str) -> bool {
    match body.get(field) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Integers, floats (truncated) and numeric strings.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

pub fn optional_text(body: &Map<String, Value>, field: &str) -> Option<String> {
    (!is_missing(body, field)).then(|| body.get(field).map(as_text)).flatten()
}

/// `all` or a negative number means no limit, anything unparsable falls back to the default.
pub fn parse_limit(raw: Option<&str>) -> Option<u32> {
    let raw = raw.map(str::trim).unwrap_or_default().to_lowercase();

    if raw == "all" {
        return None;
    }

    match raw.parse::<i64>() {
        Ok(limit) if limit < 0 => None,
        Ok(limit) => Some(u32::try_from(limit).unwrap_or(u32::MAX)),
        Err(_) => Some(DEFAULT_LIMIT),
    }
}

pub fn parse_book_id(raw: Option<&str>) -> Result<i64, AppError> {
    let raw = raw
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::required("book_id"))?;

    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest("book_id must be an integer".into()))
}
