//! Unwrapping backend response envelopes.
//!
//! Lists come back as `{ "<key>": [..] }`, `{ "data": [..] }`,
//! `{ "data": { "<key>": [..] } }` or a bare array depending on which
//! service and which version answered. Items that fail to decode are
//! skipped and logged rather than failing the whole screen.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::BackendError;

pub fn list<T: DeserializeOwned>(body: Value, key: &str) -> Vec<T> {
    let Some(items) = find_list(body, key) else {
        warn!("backend response had no `{}` list", key);
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!("skipping malformed `{}` row: {}", key, e);
                None
            }
        })
        .collect()
}

fn find_list(body: Value, key: &str) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove(key) {
                return Some(items);
            }
            match map.remove("data") {
                Some(Value::Array(items)) => Some(items),
                Some(Value::Object(mut inner)) => match inner.remove(key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                },
                _ => None,
            }
        }
        _ => None,
    }
}

/// A single document under `key`, under `data`, or the body itself.
pub fn object<T: DeserializeOwned>(body: Value, key: &str) -> Result<T, BackendError> {
    let doc = match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(v @ Value::Object(_)) => v,
            _ => match map.remove("data") {
                Some(v @ Value::Object(_)) => v,
                _ => Value::Object(map),
            },
        },
        other => other,
    };
    serde_json::from_value(doc).map_err(|e| BackendError::Decode(format!("`{key}`: {e}")))
}
