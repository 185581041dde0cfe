use serde_json::json;

/// Error codes on the wire. The four taxonomy codes map one-to-one onto the
/// page error classes; the rest are transport-level.
pub mod codes {
    pub const AUTH_ERROR: &str = "auth_error";
    pub const FETCH_ERROR: &str = "fetch_error";
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const SUBMIT_ERROR: &str = "submit_error";
    pub const BAD_PARAMS: &str = "bad_params";
    pub const BAD_JSON: &str = "bad_json";
    pub const NOT_IMPLEMENTED: &str = "not_implemented";
}

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}
