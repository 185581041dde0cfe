//! Marks pages. `marks.*` is the entry grid: roster-backed editable rows,
//! add/delete, and the validated save. `marksView.*` is the read-only list
//! over the raw marks feed with field normalization and derived
//! percentage/remark.

use serde_json::json;

use crate::api::{endpoints, submit_error_message};
use crate::calc;
use crate::ipc::error::{codes, err, ok};
use crate::ipc::helpers::{require_identity, required_str, required_usize, rows_with_seq};
use crate::ipc::types::{AppState, Request};
use crate::model::{MarkDraft, MarkEntryRaw, MarkView, Student};
use crate::page::fetch_list;

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "marks.load" | "marks.retry" => Some(handle_load(state, req).await),
        "marks.editCell" => Some(handle_edit_cell(state, req)),
        "marks.addRow" => Some(handle_add_row(state, req)),
        "marks.deleteRow" => Some(handle_delete_row(state, req)),
        "marks.rows" => Some(handle_rows(state, req)),
        "marks.save" => Some(handle_save(state, req).await),
        "marks.leave" => Some(handle_leave(state, req)),
        "marksView.load" | "marksView.retry" => Some(handle_view_load(state, req).await),
        "marksView.list" => Some(handle_view_list(state, req)),
        "marksView.leave" => Some(handle_view_leave(state, req)),
        _ => None,
    }
}

async fn handle_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let identity = match require_identity(state, req) {
        Ok(i) => i,
        Err(resp) => return resp,
    };

    let epoch = state.pages.marks.roster.begin_load();
    let result = fetch_list::<Student>(
        state.api.as_ref(),
        &endpoints::teacher_students(&identity.teacher_id),
        Some(identity.token.as_str()),
    )
    .await;

    let page = &mut state.pages.marks;
    if !page.roster.finish_load(epoch, result) {
        return ok(&req.id, json!({ "stale": true }));
    }
    if let Some(msg) = page.roster.state().error_message() {
        return err(&req.id, codes::FETCH_ERROR, msg, None);
    }

    // Rebuild the edit buffer from the fresh roster; prior edits belong to
    // the load they were made against.
    let drafts: Vec<MarkDraft> = page.roster.rows().iter().map(MarkDraft::from_student).collect();
    page.grid.reset(drafts);
    handle_rows(state, req)
}

fn handle_edit_cell(state: &mut AppState, req: &Request) -> serde_json::Value {
    let row = match required_usize(req, "row") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let field = match required_str(req, "field") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let value = match required_str(req, "value") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match state.pages.marks.grid.edit_cell(row, &field, &value) {
        Ok(()) => ok(&req.id, json!({ "row": row, "field": field })),
        Err(e) => err(&req.id, codes::BAD_PARAMS, e.to_string(), None),
    }
}

fn handle_add_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let idx = state.pages.marks.grid.add_row();
    let row = &state.pages.marks.grid.rows()[idx];
    ok(&req.id, json!({ "row": idx, "id": row.id, "seq": row.seq }))
}

fn handle_delete_row(state: &mut AppState, req: &Request) -> serde_json::Value {
    let row = match required_usize(req, "row") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.pages.marks.grid.delete_row(row) {
        Ok(removed) => ok(
            &req.id,
            json!({ "removedId": removed.id, "rows": state.pages.marks.grid.len() }),
        ),
        Err(e) => err(&req.id, codes::BAD_PARAMS, e.to_string(), None),
    }
}

fn handle_rows(state: &AppState, req: &Request) -> serde_json::Value {
    let page = &state.pages.marks;
    ok(
        &req.id,
        json!({
            "state": page.roster.state().label(),
            "error": page.roster.state().error_message(),
            "rows": page.grid.rows(),
        }),
    )
}

/// Validation runs before any network traffic: synthetic rows and all-empty
/// rows drop out, surviving cells coerce to integers, and an empty payload
/// is refused outright. The grid is untouched either way, so a failed save
/// never costs the teacher their input. No automatic refetch on success.
async fn handle_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let identity = match require_identity(state, req) {
        Ok(i) => i,
        Err(resp) => return resp,
    };

    let page = &mut state.pages.marks;
    if !page.roster.begin_save() {
        return ok(&req.id, json!({ "started": false }));
    }

    let marks = match calc::build_marks_payload(page.grid.rows()) {
        Ok(m) => m,
        Err(e) => {
            page.roster.cancel_save();
            return err(&req.id, codes::VALIDATION_ERROR, e.to_string(), None);
        }
    };
    let count = marks.len();
    let payload = json!({
        "teacherId": identity.teacher_id,
        "marks": marks,
    });

    let outcome = state
        .api
        .post_json(endpoints::ADD_MARKS, Some(identity.token.as_str()), &payload)
        .await;

    let page = &mut state.pages.marks;
    let failure = match outcome {
        Ok(resp) if resp.is_success() => None,
        Ok(resp) => Some(submit_error_message(&resp.body, "failed to save marks")),
        Err(e) => {
            tracing::warn!(error = %e, "marks save transport failure");
            Some("failed to save marks".to_string())
        }
    };

    if let Some(msg) = failure {
        page.roster.finish_save(Err(msg.clone()));
        return err(&req.id, codes::SUBMIT_ERROR, msg, None);
    }

    page.roster.finish_save(Ok(()));
    ok(&req.id, json!({ "started": true, "saved": count }))
}

fn handle_leave(state: &mut AppState, req: &Request) -> serde_json::Value {
    let page = &mut state.pages.marks;
    page.roster.leave();
    page.grid.clear();
    ok(&req.id, json!({ "state": page.roster.state().label() }))
}

async fn handle_view_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Unauthenticated feed; normalization happens here, once, so the list
    // holds exactly one shape per entry.
    let epoch = state.pages.marks_view.begin_load();
    let result = fetch_list::<MarkEntryRaw>(state.api.as_ref(), endpoints::MARKS_LIST, None)
        .await
        .map(|rows| rows.into_iter().map(MarkView::from_raw).collect());

    if !state.pages.marks_view.finish_load(epoch, result) {
        return ok(&req.id, json!({ "stale": true }));
    }
    if let Some(msg) = state.pages.marks_view.state().error_message() {
        return err(&req.id, codes::FETCH_ERROR, msg, None);
    }
    handle_view_list(state, req)
}

fn handle_view_list(state: &AppState, req: &Request) -> serde_json::Value {
    let fetcher = &state.pages.marks_view;
    ok(
        &req.id,
        json!({
            "state": fetcher.state().label(),
            "error": fetcher.state().error_message(),
            "marks": rows_with_seq(fetcher.rows()),
        }),
    )
}

fn handle_view_leave(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.pages.marks_view.leave();
    ok(&req.id, json!({ "state": state.pages.marks_view.state().label() }))
}
