#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::json;

use classdeskd::api::{Api, ApiError, ApiResponse};
use classdeskd::ipc::{self, AppState, Request};
use classdeskd::session::SessionStore;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// In-process stand-in for the school API: canned responses per
/// (method, path), every call recorded. Unrouted paths answer 404.
pub struct StubApi {
    routes: Mutex<HashMap<(&'static str, String), ApiResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_get(self, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.set_route("GET", path, status, body);
        self
    }

    pub fn with_post(self, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.set_route("POST", path, status, body);
        self
    }

    /// Swap a route mid-test, e.g. fail first then succeed on retry.
    pub fn set_route(&self, method: &'static str, path: &str, status: u16, body: serde_json::Value) {
        self.routes.lock().expect("routes lock").insert(
            (method, path.to_string()),
            ApiResponse {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn calls_to(&self, method: &'static str, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn respond(
        &self,
        method: &'static str,
        path: &str,
        bearer: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ApiError> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            method,
            path: path.to_string(),
            bearer: bearer.map(|s| s.to_string()),
            body,
        });
        Ok(self
            .routes
            .lock()
            .expect("routes lock")
            .get(&(method, path.to_string()))
            .cloned()
            .unwrap_or(ApiResponse {
                status: 404,
                body: "{}".to_string(),
            }))
    }
}

#[async_trait]
impl Api for StubApi {
    async fn get(&self, path: &str, bearer: Option<&str>) -> Result<ApiResponse, ApiError> {
        self.respond("GET", path, bearer, None)
    }

    async fn post_json(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, ApiError> {
        self.respond("POST", path, bearer, Some(body.clone()))
    }
}

fn temp_path(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "{}-{}.json",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ))
}

/// State with a profile on disk for teacher "t1" / token "tok-1".
pub fn signed_in_state(api: Arc<StubApi>) -> AppState {
    let profile = temp_path("classdesk-test-profile");
    std::fs::write(
        &profile,
        json!({ "teacherId": "t1", "userId": "t1", "token": "tok-1" }).to_string(),
    )
    .expect("write profile");
    AppState::new(SessionStore::new(profile), api)
}

/// State pointing at a profile path that does not exist.
pub fn signed_out_state(api: Arc<StubApi>) -> AppState {
    AppState::new(SessionStore::new(temp_path("classdesk-missing-profile")), api)
}

pub async fn request(
    state: &mut AppState,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let req: Request = serde_json::from_value(json!({
        "id": id,
        "method": method,
        "params": params,
    }))
    .expect("build request");
    let resp = ipc::handle_request(state, req).await;
    assert_eq!(resp.get("id").and_then(|v| v.as_str()), Some(id));
    resp
}

pub fn expect_ok<'a>(resp: &'a serde_json::Value, context: &str) -> &'a serde_json::Value {
    assert_eq!(
        resp.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "expected ok for {context}, got: {resp}"
    );
    resp.get("result").expect("ok response carries result")
}

pub fn expect_err<'a>(resp: &'a serde_json::Value, code: &str, context: &str) -> &'a serde_json::Value {
    assert_eq!(
        resp.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "expected error for {context}, got: {resp}"
    );
    let error = resp.get("error").expect("error envelope");
    assert_eq!(
        error.get("code").and_then(|v| v.as_str()),
        Some(code),
        "wrong code for {context}, got: {resp}"
    );
    error
}

pub fn students_fixture() -> serde_json::Value {
    json!([
        { "_id": 7, "studentName": "Asha Patil", "className": "10", "section": "A", "gender": "F", "phone": "9000000001" },
        { "id": "9", "name": "Ravi Kumar", "class": "10", "section": "A", "gender": "M", "contact": "9000000002" },
        { "id": "11", "name": "Sunita More", "class": "10", "section": "A", "gender": "F", "contact": "9000000003" }
    ])
}
