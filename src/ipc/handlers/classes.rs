//! Assigned-classes page: a read-only list with the shared fetch lifecycle.

use serde_json::json;

use crate::api::endpoints;
use crate::ipc::error::{codes, err, ok};
use crate::ipc::helpers::{require_identity, rows_with_seq};
use crate::ipc::types::{AppState, Request};
use crate::model::ClassInfo;
use crate::page::fetch_list;

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        // retry re-runs the identical load.
        "classes.load" | "classes.retry" => Some(handle_load(state, req).await),
        "classes.list" => Some(handle_list(state, req)),
        "classes.leave" => Some(handle_leave(state, req)),
        _ => None,
    }
}

async fn handle_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let identity = match require_identity(state, req) {
        Ok(i) => i,
        Err(resp) => return resp,
    };

    let epoch = state.pages.classes.begin_load();
    let result = fetch_list::<ClassInfo>(
        state.api.as_ref(),
        &endpoints::teacher_classes(&identity.teacher_id),
        Some(identity.token.as_str()),
    )
    .await;

    if !state.pages.classes.finish_load(epoch, result) {
        return ok(&req.id, json!({ "stale": true }));
    }
    if let Some(msg) = state.pages.classes.state().error_message() {
        return err(&req.id, codes::FETCH_ERROR, msg, None);
    }
    handle_list(state, req)
}

fn handle_list(state: &AppState, req: &Request) -> serde_json::Value {
    let fetcher = &state.pages.classes;
    ok(
        &req.id,
        json!({
            "state": fetcher.state().label(),
            "error": fetcher.state().error_message(),
            "classes": rows_with_seq(fetcher.rows()),
        }),
    )
}

fn handle_leave(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.pages.classes.leave();
    ok(&req.id, json!({ "state": state.pages.classes.state().label() }))
}
