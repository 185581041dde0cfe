//! HTTP seam between page controllers and the school REST API.
//!
//! Handlers never touch `reqwest` directly: they go through the `Api` trait,
//! which returns raw status + body so the page layer owns the fetch/parse
//! policy (non-success bodies are never parsed as data). Tests substitute a
//! recording stub behind the same trait.

use std::time::Duration;

use async_trait::async_trait;

/// Raw response as seen by the page layer.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Api: Send + Sync {
    async fn get(&self, path: &str, bearer: Option<&str>) -> Result<ApiResponse, ApiError>;

    async fn post_json(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, ApiError>;
}

/// Endpoint paths, rooted at the configured base URL.
pub mod endpoints {
    pub fn teacher_classes(teacher_id: &str) -> String {
        format!("/api/teachers/{teacher_id}/classes")
    }

    pub fn teacher_students(teacher_id: &str) -> String {
        format!("/api/teachers/{teacher_id}/students")
    }

    pub fn teacher_attendance(teacher_id: &str) -> String {
        format!("/api/teachers/{teacher_id}/attendance")
    }

    // These two are served unauthenticated; no bearer header is sent.
    pub const ATTENDANCE_ALL: &str = "/api/teachers/attendance/all";
    pub const MARKS_LIST: &str = "/api/marks";

    pub const MARK_ATTENDANCE: &str = "/api/teachers/mark";
    pub const ADD_MARKS: &str = "/api/teachers/marks/add";
}

/// Production implementation over a shared `reqwest` client.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<ApiResponse, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn get(&self, path: &str, bearer: Option<&str>) -> Result<ApiResponse, ApiError> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        self.send(req).await
    }

    async fn post_json(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, ApiError> {
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        self.send(req).await
    }
}

/// Pull a server-supplied `message` out of a failed write response body,
/// falling back when the body is not JSON or carries no message.
pub fn submit_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| fallback.to_string())
}
