mod common;

use std::sync::Arc;

use common::{expect_err, expect_ok, request, signed_in_state, students_fixture, StubApi};
use serde_json::json;

const STUDENTS_PATH: &str = "/api/teachers/t1/students";
const ADD_MARKS_PATH: &str = "/api/teachers/marks/add";

async fn edit(state: &mut classdeskd::ipc::AppState, row: u64, field: &str, value: &str) {
    let resp = request(
        state,
        "edit",
        "marks.editCell",
        json!({ "row": row, "field": field, "value": value }),
    )
    .await;
    expect_ok(&resp, "editCell");
}

#[tokio::test]
async fn payload_filters_synthetic_and_empty_rows_and_coerces() {
    let api = Arc::new(
        StubApi::new()
            .with_get(STUDENTS_PATH, 200, students_fixture())
            .with_post(ADD_MARKS_PATH, 200, json!({ "success": true })),
    );
    let mut state = signed_in_state(api.clone());
    request(&mut state, "load", "marks.load", json!({})).await;

    // Row 0 = student 7: one subject filled, rest empty -> kept, coerced.
    edit(&mut state, 0, "hindi", "60").await;
    // Rows 1 and 2 (students 9, 11) left all-empty -> dropped.
    // Appended synthetic row with a mark -> dropped by id policy.
    request(&mut state, "add", "marks.addRow", json!({})).await;
    edit(&mut state, 3, "marathi", "50").await;

    let resp = request(&mut state, "save", "marks.save", json!({})).await;
    let result = expect_ok(&resp, "marks.save");
    assert_eq!(result.get("started").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(result.get("saved").and_then(|v| v.as_u64()), Some(1));

    let posts: Vec<_> = api
        .calls()
        .into_iter()
        .filter(|c| c.method == "POST")
        .collect();
    assert_eq!(posts.len(), 1);
    let body = posts[0].body.as_ref().expect("post body");
    assert_eq!(body["teacherId"], "t1");
    let marks = body["marks"].as_array().expect("marks array");
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0]["studentId"], "7");
    assert_eq!(marks[0]["marathi"], 0, "empty coerces to 0");
    assert_eq!(marks[0]["hindi"], 60);
    assert_eq!(posts[0].bearer.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn empty_payload_is_refused_before_any_network_call() {
    let api = Arc::new(StubApi::new().with_get(STUDENTS_PATH, 200, students_fixture()));
    let mut state = signed_in_state(api.clone());
    request(&mut state, "load", "marks.load", json!({})).await;

    // Only a synthetic row carries marks; every saved row is empty.
    request(&mut state, "add", "marks.addRow", json!({})).await;
    edit(&mut state, 3, "marathi", "50").await;

    let resp = request(&mut state, "save", "marks.save", json!({})).await;
    let error = expect_err(&resp, "validation_error", "nothing valid to save");
    assert_eq!(
        error.get("message").and_then(|v| v.as_str()),
        Some("no valid marks to save")
    );
    assert_eq!(api.calls_to("POST", ADD_MARKS_PATH), 0);

    // Page is not stuck in Saving after the client-side rejection.
    let resp = request(&mut state, "rows", "marks.rows", json!({})).await;
    let result = expect_ok(&resp, "marks.rows");
    assert_eq!(result.get("state").and_then(|v| v.as_str()), Some("ready"));
}

#[tokio::test]
async fn submit_failure_surfaces_server_message_and_keeps_edits() {
    let api = Arc::new(
        StubApi::new()
            .with_get(STUDENTS_PATH, 200, students_fixture())
            .with_post(ADD_MARKS_PATH, 400, json!({ "message": "marks already entered" })),
    );
    let mut state = signed_in_state(api.clone());
    request(&mut state, "load", "marks.load", json!({})).await;
    edit(&mut state, 0, "english", "72").await;

    let resp = request(&mut state, "save", "marks.save", json!({})).await;
    let error = expect_err(&resp, "submit_error", "server rejection");
    assert_eq!(
        error.get("message").and_then(|v| v.as_str()),
        Some("marks already entered")
    );

    // The edit buffer survives so the teacher can retry.
    let resp = request(&mut state, "rows", "marks.rows", json!({})).await;
    let result = expect_ok(&resp, "marks.rows");
    assert_eq!(result.get("state").and_then(|v| v.as_str()), Some("error"));
    let rows = result["rows"].as_array().expect("rows");
    assert_eq!(rows[0].get("english").and_then(|v| v.as_str()), Some("72"));

    // And a second attempt goes through once the server accepts.
    api.set_route("POST", ADD_MARKS_PATH, 200, json!({ "success": true }));
    let resp = request(&mut state, "save2", "marks.save", json!({})).await;
    let result = expect_ok(&resp, "marks.save retry");
    assert_eq!(result.get("saved").and_then(|v| v.as_u64()), Some(1));
}

#[tokio::test]
async fn submit_failure_without_message_uses_fallback() {
    let api = Arc::new(
        StubApi::new()
            .with_get(STUDENTS_PATH, 200, students_fixture())
            .with_post(ADD_MARKS_PATH, 500, json!({ "weird": [] })),
    );
    let mut state = signed_in_state(api);
    request(&mut state, "load", "marks.load", json!({})).await;
    edit(&mut state, 0, "math", "40").await;

    let resp = request(&mut state, "save", "marks.save", json!({})).await;
    let error = expect_err(&resp, "submit_error", "server rejection without message");
    assert_eq!(
        error.get("message").and_then(|v| v.as_str()),
        Some("failed to save marks")
    );
}

#[tokio::test]
async fn marks_save_does_not_auto_refetch() {
    let api = Arc::new(
        StubApi::new()
            .with_get(STUDENTS_PATH, 200, students_fixture())
            .with_post(ADD_MARKS_PATH, 200, json!({ "success": true })),
    );
    let mut state = signed_in_state(api.clone());
    request(&mut state, "load", "marks.load", json!({})).await;
    edit(&mut state, 0, "science", "90").await;

    request(&mut state, "save", "marks.save", json!({})).await;
    assert_eq!(
        api.calls_to("GET", STUDENTS_PATH),
        1,
        "reconciliation refetch is the caller's choice on this page"
    );
}
