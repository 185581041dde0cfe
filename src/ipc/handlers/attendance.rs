//! Attendance-marking page: roster fetch, per-student status selection,
//! save of today's statuses, and the recent-history list that refreshes
//! itself after a successful save.

use serde_json::json;

use crate::api::{endpoints, submit_error_message};
use crate::ipc::error::{codes, err, ok};
use crate::ipc::helpers::{require_identity, required_str, rows_with_seq};
use crate::ipc::types::{AppState, Request};
use crate::model::{AttendanceRecord, AttendanceStatus, Student};
use crate::page::fetch_list;
use crate::session::Identity;

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.load" | "attendance.retry" => Some(handle_load(state, req).await),
        "attendance.setStatus" => Some(handle_set_status(state, req)),
        "attendance.clearStatus" => Some(handle_clear_status(state, req)),
        "attendance.list" => Some(handle_list(state, req)),
        "attendance.save" => Some(handle_save(state, req).await),
        "attendance.history.load" | "attendance.history.retry" => {
            Some(handle_history_load(state, req).await)
        }
        "attendance.history.list" => Some(handle_history_list(state, req)),
        "attendance.leave" => Some(handle_leave(state, req)),
        _ => None,
    }
}

async fn handle_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let identity = match require_identity(state, req) {
        Ok(i) => i,
        Err(resp) => return resp,
    };

    let page = &mut state.pages.attendance;
    let epoch = page.roster.begin_load();
    let result = fetch_list::<Student>(
        state.api.as_ref(),
        &endpoints::teacher_students(&identity.teacher_id),
        Some(identity.token.as_str()),
    )
    .await;

    let page = &mut state.pages.attendance;
    if !page.roster.finish_load(epoch, result) {
        return ok(&req.id, json!({ "stale": true }));
    }
    if let Some(msg) = page.roster.state().error_message() {
        return err(&req.id, codes::FETCH_ERROR, msg, None);
    }
    handle_list(state, req)
}

fn handle_set_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let status_raw = match required_str(req, "status") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(status) = AttendanceStatus::parse(&status_raw) else {
        return err(
            &req.id,
            codes::BAD_PARAMS,
            "status must be Present or Absent",
            Some(json!({ "status": status_raw })),
        );
    };

    let page = &mut state.pages.attendance;
    if !page.roster.rows().iter().any(|s| s.id == student_id) {
        return err(
            &req.id,
            codes::BAD_PARAMS,
            "student not in loaded roster",
            Some(json!({ "studentId": student_id })),
        );
    }

    page.selections.insert(student_id, status);
    ok(&req.id, json!({ "selected": page.selections.len() }))
}

fn handle_clear_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let page = &mut state.pages.attendance;
    page.selections.remove(&student_id);
    ok(&req.id, json!({ "selected": page.selections.len() }))
}

fn handle_list(state: &AppState, req: &Request) -> serde_json::Value {
    let page = &state.pages.attendance;
    let selections: Vec<serde_json::Value> = page
        .selections
        .iter()
        .map(|(student_id, status)| {
            json!({ "studentId": student_id, "status": status.as_str() })
        })
        .collect();
    ok(
        &req.id,
        json!({
            "state": page.roster.state().label(),
            "error": page.roster.state().error_message(),
            "students": rows_with_seq(page.roster.rows()),
            "selections": selections,
        }),
    )
}

/// Payload is every student with a selected status, stamped with today's
/// calendar date and the session's teacher id. On success the selections
/// clear and the history view refreshes; on failure they stay put so the
/// teacher loses nothing.
async fn handle_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let identity = match require_identity(state, req) {
        Ok(i) => i,
        Err(resp) => return resp,
    };

    let page = &mut state.pages.attendance;
    if !page.roster.begin_save() {
        return ok(&req.id, json!({ "started": false }));
    }
    if page.selections.is_empty() {
        page.roster.cancel_save();
        return err(&req.id, codes::VALIDATION_ERROR, "no attendance to save", None);
    }

    let today = chrono::Local::now().date_naive().to_string();
    let records: Vec<serde_json::Value> = page
        .selections
        .iter()
        .map(|(student_id, status)| {
            json!({
                "studentId": student_id,
                "status": status.as_str(),
                "date": today,
                "teacherId": identity.teacher_id,
            })
        })
        .collect();
    let count = records.len();

    let outcome = state
        .api
        .post_json(
            endpoints::MARK_ATTENDANCE,
            Some(identity.token.as_str()),
            &serde_json::Value::Array(records),
        )
        .await;

    let page = &mut state.pages.attendance;
    let failure = match outcome {
        Ok(resp) if resp.is_success() => None,
        Ok(resp) => Some(submit_error_message(&resp.body, "failed to save attendance")),
        Err(e) => {
            tracing::warn!(error = %e, "attendance save transport failure");
            Some("failed to save attendance".to_string())
        }
    };

    if let Some(msg) = failure {
        page.roster.finish_save(Err(msg.clone()));
        return err(&req.id, codes::SUBMIT_ERROR, msg, None);
    }

    page.roster.finish_save(Ok(()));
    page.selections.clear();

    refresh_history(state, &identity).await;
    ok(
        &req.id,
        json!({
            "started": true,
            "saved": count,
            "history": state.pages.attendance.history.state().label(),
        }),
    )
}

async fn refresh_history(state: &mut AppState, identity: &Identity) {
    let epoch = state.pages.attendance.history.begin_load();
    let result = fetch_list::<AttendanceRecord>(
        state.api.as_ref(),
        &endpoints::teacher_attendance(&identity.teacher_id),
        Some(identity.token.as_str()),
    )
    .await;
    state.pages.attendance.history.finish_load(epoch, result);
}

async fn handle_history_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let identity = match require_identity(state, req) {
        Ok(i) => i,
        Err(resp) => return resp,
    };
    refresh_history(state, &identity).await;
    if let Some(msg) = state.pages.attendance.history.state().error_message() {
        return err(&req.id, codes::FETCH_ERROR, msg, None);
    }
    handle_history_list(state, req)
}

fn handle_history_list(state: &AppState, req: &Request) -> serde_json::Value {
    let history = &state.pages.attendance.history;
    ok(
        &req.id,
        json!({
            "state": history.state().label(),
            "error": history.state().error_message(),
            "records": rows_with_seq(history.rows()),
        }),
    )
}

fn handle_leave(state: &mut AppState, req: &Request) -> serde_json::Value {
    let page = &mut state.pages.attendance;
    page.roster.leave();
    page.history.leave();
    page.selections.clear();
    ok(&req.id, json!({ "state": page.roster.state().label() }))
}
