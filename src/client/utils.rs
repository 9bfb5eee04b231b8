//! Utility functions for the oneM2M client.
//!
//! This module provides helpers for:
//! - Request identifier assignment
//! - Wrapper key access on `{ "m2m:<type>": { ... } }` payloads
//! - Merging sent and received attributes after a create
//! - Extracting an operator-facing message from a failed response

use crate::types::RawResponse;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of request identifiers.
///
/// Identifiers are decimal strings from a shared counter; the first one
/// issued is `"2"`. Clones share the counter.
#[derive(Clone, Debug)]
pub struct RequestIds {
    counter: Arc<AtomicU64>,
}

impl RequestIds {
    /// Fresh counter.
    pub fn new() -> Self {
        RequestIds {
            counter: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Next request identifier.
    pub fn next_id(&self) -> String {
        (self.counter.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

impl Default for RequestIds {
    fn default() -> Self {
        Self::new()
    }
}

/// First key of a wrapped payload (`m2m:cnt`).
pub fn wrapper_key(payload: &Value) -> Option<&str> {
    payload
        .as_object()
        .and_then(|map| map.keys().next())
        .map(String::as_str)
}

/// Overlay the attributes the server returned onto the attributes that were
/// sent, under the sent payload's wrapper key.
///
/// The server answers a create with the attributes it assigned (`ri`, `ct`,
/// ...). The sent attributes fill in whatever it did not echo.
pub fn combine_attrs(mut sent: Value, received: Option<&Value>) -> Value {
    let Some(key) = wrapper_key(&sent).map(str::to_string) else {
        return received.cloned().unwrap_or(sent);
    };
    let incoming = received
        .and_then(|r| r.get(&key))
        .and_then(Value::as_object);

    if let (Some(target), Some(incoming)) = (sent.get_mut(&key), incoming) {
        if !target.is_object() {
            *target = Value::Object(Map::new());
        }
        if let Some(target) = target.as_object_mut() {
            for (k, v) in incoming {
                target.insert(k.clone(), v.clone());
            }
        }
    }
    sent
}

/// Operator-facing message for a failed response.
///
/// The JSON serialization of the body's `error` field if there is one, else
/// of the whole body. A body that is not JSON is serialized as a string; an
/// empty body falls back to the HTTP reason phrase.
pub fn error_message(raw: &RawResponse) -> String {
    match serde_json::from_slice::<Value>(&raw.body) {
        Ok(body) => match body.get("error") {
            Some(error) if !error.is_null() => error.to_string(),
            _ => body.to_string(),
        },
        Err(_) => {
            let text = raw.body_str().map(str::trim).unwrap_or_default();
            let text = if text.is_empty() {
                http::StatusCode::from_u16(raw.status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(|reason| format!("{} {}", raw.status, reason))
                    .unwrap_or_else(|| raw.status.to_string())
            } else {
                text.to_string()
            };
            Value::String(text).to_string()
        }
    }
}
