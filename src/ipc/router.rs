use super::error::{codes, err};
use super::handlers;
use super::types::{AppState, Request};

pub async fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    tracing::debug!(id = %req.id, method = %req.method, "dispatch");

    if let Some(resp) = handlers::core::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::classes::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::students::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::attendance::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::report::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::marks::try_handle(state, &req).await {
        return resp;
    }

    err(
        &req.id,
        codes::NOT_IMPLEMENTED,
        format!("unknown method: {}", req.method),
        None,
    )
}
