//! Enrolled-students page: read-only roster list.

use serde_json::json;

use crate::api::endpoints;
use crate::ipc::error::{codes, err, ok};
use crate::ipc::helpers::{require_identity, rows_with_seq};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;
use crate::page::fetch_list;

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.load" | "students.retry" => Some(handle_load(state, req).await),
        "students.list" => Some(handle_list(state, req)),
        "students.leave" => Some(handle_leave(state, req)),
        _ => None,
    }
}

async fn handle_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let identity = match require_identity(state, req) {
        Ok(i) => i,
        Err(resp) => return resp,
    };

    let epoch = state.pages.students.begin_load();
    let result = fetch_list::<Student>(
        state.api.as_ref(),
        &endpoints::teacher_students(&identity.teacher_id),
        Some(identity.token.as_str()),
    )
    .await;

    if !state.pages.students.finish_load(epoch, result) {
        return ok(&req.id, json!({ "stale": true }));
    }
    if let Some(msg) = state.pages.students.state().error_message() {
        return err(&req.id, codes::FETCH_ERROR, msg, None);
    }
    handle_list(state, req)
}

fn handle_list(state: &AppState, req: &Request) -> serde_json::Value {
    let fetcher = &state.pages.students;
    ok(
        &req.id,
        json!({
            "state": fetcher.state().label(),
            "error": fetcher.state().error_message(),
            "students": rows_with_seq(fetcher.rows()),
        }),
    )
}

fn handle_leave(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.pages.students.leave();
    ok(&req.id, json!({ "state": state.pages.students.state().label() }))
}
