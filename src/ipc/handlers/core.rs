use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(ok(
            &req.id,
            json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            }),
        )),
        "session.status" => Some(handle_session_status(state, req)),
        _ => None,
    }
}

/// Non-gated query: reports signed-in state rather than failing, so the
/// shell can render the auth-required screen.
fn handle_session_status(state: &AppState, req: &Request) -> serde_json::Value {
    match state.session.identity() {
        Ok(identity) => ok(
            &req.id,
            json!({
                "signedIn": true,
                "teacherId": identity.teacher_id,
            }),
        ),
        Err(e) => ok(
            &req.id,
            json!({
                "signedIn": false,
                "reason": e.to_string(),
            }),
        ),
    }
}
