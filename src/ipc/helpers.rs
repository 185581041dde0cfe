use serde_json::Value;

use super::error::{codes, err};
use super::types::{AppState, Request};
use crate::session::Identity;

/// Param extraction; failures become ready-to-return `bad_params` envelopes.
pub fn required_str(req: &Request, key: &str) -> Result<String, Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| err(&req.id, codes::BAD_PARAMS, format!("missing {key}"), None))
}

pub fn required_usize(req: &Request, key: &str) -> Result<usize, Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .ok_or_else(|| {
            err(
                &req.id,
                codes::BAD_PARAMS,
                format!("missing or non-numeric {key}"),
                None,
            )
        })
}

pub fn optional_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Serialize rows for a list reply, stamping each with its 1-based display
/// sequence number.
pub fn rows_with_seq<T: serde::Serialize>(rows: &[T]) -> Vec<Value> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut v = serde_json::to_value(row).unwrap_or_else(|_| Value::Null);
            if let Value::Object(ref mut map) = v {
                map.insert("seq".to_string(), Value::from(i as u64 + 1));
            }
            v
        })
        .collect()
}

/// Identity gate for authenticated pages: without one, reply `auth_error`
/// and issue no network call.
pub fn require_identity(state: &AppState, req: &Request) -> Result<Identity, Value> {
    state
        .session
        .identity()
        .map_err(|e| err(&req.id, codes::AUTH_ERROR, e.to_string(), None))
}
