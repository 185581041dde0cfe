//! The fetch/save lifecycle every dashboard page shares.
//!
//! One explicit state value per page replaces scattered loading/error/saving
//! flags, so impossible combinations (saving while still loading) cannot be
//! represented. An epoch counter guards against late completions: a load
//! that finishes after the page was left, or after a newer load started, is
//! discarded instead of clobbering current state.

use serde::de::DeserializeOwned;

use crate::api::{Api, ApiResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Idle,
    Loading,
    Ready,
    Saving,
    Error(String),
}

impl PageState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Saving => "saving",
            Self::Error(_) => "error",
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Non-success status or transport failure. The body is not consulted.
    #[error("request failed")]
    RequestFailed,
    #[error("invalid response body")]
    BadBody,
}

/// Loads a collection and tracks the page lifecycle around it.
#[derive(Debug)]
pub struct Fetcher<T> {
    state: PageState,
    rows: Vec<T>,
    epoch: u64,
}

impl<T> Fetcher<T> {
    pub fn new() -> Self {
        Self {
            state: PageState::Idle,
            rows: Vec::new(),
            epoch: 0,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Start (or restart) a load: clears any prior error, enters Loading,
    /// and returns the epoch the completion must present to be applied.
    pub fn begin_load(&mut self) -> u64 {
        self.epoch += 1;
        self.state = PageState::Loading;
        self.epoch
    }

    /// Apply a load completion. Returns false when the completion is stale
    /// (page left or a newer load started) and was discarded; loading is
    /// considered cleared either way for the epoch that finished.
    pub fn finish_load(&mut self, epoch: u64, result: Result<Vec<T>, FetchError>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match result {
            Ok(rows) => {
                self.rows = rows;
                self.state = PageState::Ready;
            }
            Err(e) => {
                self.state = PageState::Error(e.to_string());
            }
        }
        true
    }

    /// Gate for the save control: a save while one is in flight is a no-op.
    pub fn begin_save(&mut self) -> bool {
        if matches!(self.state, PageState::Saving) {
            return false;
        }
        self.state = PageState::Saving;
        true
    }

    /// Back out of Saving without a network attempt (client-side rejection).
    pub fn cancel_save(&mut self) {
        if matches!(self.state, PageState::Saving) {
            self.state = PageState::Ready;
        }
    }

    pub fn finish_save(&mut self, result: Result<(), String>) {
        self.state = match result {
            Ok(()) => PageState::Ready,
            Err(msg) => PageState::Error(msg),
        };
    }

    /// Page teardown: drop the collection and invalidate in-flight loads.
    pub fn leave(&mut self) {
        self.epoch += 1;
        self.rows.clear();
        self.state = PageState::Idle;
    }
}

impl<T> Default for Fetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared fetch policy: a non-success status fails without parsing the body
/// as data; a success body must parse as a JSON array of `T`.
pub async fn fetch_list<T: DeserializeOwned>(
    api: &dyn Api,
    path: &str,
    bearer: Option<&str>,
) -> Result<Vec<T>, FetchError> {
    let resp: ApiResponse = match api.get(path, bearer).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(path, error = %e, "fetch transport failure");
            return Err(FetchError::RequestFailed);
        }
    };
    if !resp.is_success() {
        tracing::warn!(path, status = resp.status, "fetch rejected");
        return Err(FetchError::RequestFailed);
    }
    serde_json::from_str::<Vec<T>>(&resp.body).map_err(|e| {
        tracing::warn!(path, error = %e, "fetch body not a collection");
        FetchError::BadBody
    })
}
