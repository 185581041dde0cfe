mod common;

use std::sync::Arc;

use common::{expect_ok, request, signed_out_state, StubApi};
use serde_json::json;

const MARKS_PATH: &str = "/api/marks";

#[tokio::test]
async fn tolerant_names_and_derived_percentages_normalize_once() {
    let api = Arc::new(StubApi::new().with_get(
        MARKS_PATH,
        200,
        json!([
            { "studentName": "Asha", "totalMarks": 72, "maxMarks": 90 },
            { "userName": "Ravi", "totalMarks": 30, "maxMarks": 100 },
            { "name": "Sunita", "percentage": 55.5, "totalMarks": 10, "maxMarks": 20 },
            { "totalMarks": "45", "maxMarks": "50" }
        ]),
    ));
    let mut state = signed_out_state(api.clone());

    let resp = request(&mut state, "1", "marksView.load", json!({})).await;
    let result = expect_ok(&resp, "marksView.load");
    let marks = result["marks"].as_array().expect("marks");
    assert_eq!(marks.len(), 4);

    // Derived from totals when no percentage is supplied.
    assert_eq!(marks[0]["studentName"], "Asha");
    assert_eq!(marks[0]["percentage"], 80.0);
    assert_eq!(marks[0]["remark"], "Pass");

    assert_eq!(marks[1]["studentName"], "Ravi");
    assert_eq!(marks[1]["percentage"], 30.0);
    assert_eq!(marks[1]["remark"], "Fail");

    // A supplied percentage wins over raw totals.
    assert_eq!(marks[2]["studentName"], "Sunita");
    assert_eq!(marks[2]["percentage"], 55.5);
    assert_eq!(marks[2]["remark"], "Pass");

    // Numeric strings and a missing name still normalize.
    assert_eq!(marks[3]["studentName"], "Unknown");
    assert_eq!(marks[3]["percentage"], 90.0);

    for (i, m) in marks.iter().enumerate() {
        assert_eq!(m["seq"].as_u64(), Some(i as u64 + 1));
    }

    // Unauthenticated feed.
    assert!(api.calls()[0].bearer.is_none());
}

#[tokio::test]
async fn leave_then_reload_fetches_fresh() {
    let api = Arc::new(StubApi::new().with_get(MARKS_PATH, 200, json!([])));
    let mut state = signed_out_state(api.clone());

    request(&mut state, "1", "marksView.load", json!({})).await;
    request(&mut state, "2", "marksView.leave", json!({})).await;
    let resp = request(&mut state, "3", "marksView.list", json!({})).await;
    let result = expect_ok(&resp, "list after leave");
    assert_eq!(result.get("state").and_then(|v| v.as_str()), Some("idle"));

    request(&mut state, "4", "marksView.load", json!({})).await;
    assert_eq!(api.calls_to("GET", MARKS_PATH), 2, "no cache across page visits");
}
