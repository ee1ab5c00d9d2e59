//! Inbound webhook decoding and field extraction.
//!
//! CRM webhooks arrive either as a JSON body, as a form-encoded body, or as query
//! parameters using bracket keys (`fields[PHONE][0][VALUE]=...`). All three are
//! decoded into the same nested JSON shape before fields are read.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::contacts::phone::normalize;
use crate::models::contact::MISSING;
use crate::models::webhook::InboundLead;

pub const PHONE_POINTER: &str = "/fields/PHONE/0/VALUE";
pub const TITLE_POINTER: &str = "/fields/TITLE";
pub const COMMENTS_POINTER: &str = "/fields/COMMENTS";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload must be an object")]
    NotAnObject,
}

/// Decodes the request body and query string into one payload object.
/// A body carrying any fields wins over the query string.
pub fn decode_payload(
    content_type: Option<&str>,
    body: &[u8],
    query: Option<&str>,
) -> Result<Value, PayloadError> {
    let body_value = decode_body(content_type, body)?;
    match body_value {
        Value::Object(map) if !map.is_empty() => Ok(Value::Object(map)),
        Value::Object(_) | Value::Null => Ok(form_to_value(query.unwrap_or_default().as_bytes())),
        _ => Err(PayloadError::NotAnObject),
    }
}

fn decode_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, PayloadError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
    let looks_like_json = body
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| matches!(*b, b'{' | b'['));

    if content_type.contains("json")
        || (!content_type.contains("x-www-form-urlencoded") && looks_like_json)
    {
        Ok(serde_json::from_slice(body)?)
    } else {
        Ok(form_to_value(body))
    }
}

/// Expands `a[b][0][c]=v` pairs into nested objects. Numeric segments stay object
/// keys; JSON pointer lookups treat `"0"` the same for objects and arrays.
pub fn form_to_value(encoded: &[u8]) -> Value {
    let mut root = Map::new();
    for (key, value) in url::form_urlencoded::parse(encoded) {
        insert_path(&mut root, &key_segments(&key), value.into_owned());
    }
    Value::Object(root)
}

fn key_segments(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_string()];
    };

    let mut segments = vec![key[..open].to_string()];
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            // Unbalanced brackets: keep the raw key.
            return vec![key.to_string()];
        };
        segments.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }
    if !rest.is_empty() {
        return vec![key.to_string()];
    }
    segments
}

fn insert_path(root: &mut Map<String, Value>, segments: &[String], value: String) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        let entry = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(child) = entry else {
            return;
        };
        node = child;
    }
    node.insert(last.clone(), Value::String(value));
}

/// Reads the scalar at `pointer`, or `default` when any level is missing,
/// null, empty, or not a scalar. Never fails.
pub fn extract_field(payload: &Value, pointer: &str, default: &str) -> String {
    match payload.pointer(pointer) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

/// Pulls phone, title and comments out of a decoded payload. Phone is normalized.
pub fn extract_lead(payload: &Value) -> InboundLead {
    InboundLead {
        phone: normalize(&extract_field(payload, PHONE_POINTER, MISSING)),
        title: extract_field(payload, TITLE_POINTER, MISSING),
        comments: extract_field(payload, COMMENTS_POINTER, MISSING),
    }
}
