//! Attendance report page: the all-teachers history feed with client-side
//! filtering. The feed is one of the two unauthenticated endpoints, so this
//! page works without a session and sends no bearer header.

use serde_json::json;

use crate::api::endpoints;
use crate::filter::{apply, summarize, ReportFilter};
use crate::ipc::error::{codes, err, ok};
use crate::ipc::helpers::{optional_str, rows_with_seq};
use crate::ipc::types::{AppState, Request};
use crate::model::AttendanceRecord;
use crate::page::fetch_list;

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "report.load" | "report.retry" => Some(handle_load(state, req).await),
        "report.filter" => Some(handle_filter(state, req)),
        "report.clearFilters" => Some(handle_clear_filters(state, req)),
        "report.list" => Some(handle_list(state, req)),
        "report.leave" => Some(handle_leave(state, req)),
        _ => None,
    }
}

async fn handle_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let epoch = state.pages.report.history.begin_load();
    let result =
        fetch_list::<AttendanceRecord>(state.api.as_ref(), endpoints::ATTENDANCE_ALL, None).await;

    if !state.pages.report.history.finish_load(epoch, result) {
        return ok(&req.id, json!({ "stale": true }));
    }
    if let Some(msg) = state.pages.report.history.state().error_message() {
        return err(&req.id, codes::FETCH_ERROR, msg, None);
    }
    handle_list(state, req)
}

/// Missing or blank params clear that dimension; both set means AND.
fn handle_filter(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.pages.report.filter = ReportFilter {
        date: optional_str(req, "date"),
        class_label: optional_str(req, "className"),
    };
    handle_list(state, req)
}

fn handle_clear_filters(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.pages.report.filter = ReportFilter::default();
    handle_list(state, req)
}

fn handle_list(state: &AppState, req: &Request) -> serde_json::Value {
    let page = &state.pages.report;
    let visible = apply(page.history.rows(), &page.filter);
    let summary = summarize(&visible);
    ok(
        &req.id,
        json!({
            "state": page.history.state().label(),
            "error": page.history.state().error_message(),
            "filter": {
                "date": page.filter.date,
                "className": page.filter.class_label,
            },
            "records": rows_with_seq(&visible),
            "summary": summary,
        }),
    )
}

fn handle_leave(state: &mut AppState, req: &Request) -> serde_json::Value {
    let page = &mut state.pages.report;
    page.history.leave();
    page.filter = ReportFilter::default();
    ok(&req.id, json!({ "state": page.history.state().label() }))
}
