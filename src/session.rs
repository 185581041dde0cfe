//! Session identity read from a persisted profile file (the UI shell writes
//! it at sign-in; this side only reads). Pages that need the API must obtain
//! an `Identity` first; without one they surface an auth error and issue no
//! network calls.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

fn de_opt_flex_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flex {
        Str(String),
        Int(i64),
    }
    Ok(match Option::<Flex>::deserialize(d)? {
        Some(Flex::Str(s)) => Some(s),
        Some(Flex::Int(n)) => Some(n.to_string()),
        None => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Profile {
    #[serde(default, deserialize_with = "de_opt_flex_string")]
    teacher_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_flex_string")]
    user_id: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Identity {
    pub teacher_id: String,
    pub token: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("not signed in")]
    MissingIdentity,
    #[error("session profile unreadable: {0}")]
    Unreadable(String),
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Re-read on every call so a sign-in/sign-out by the shell takes effect
    /// without restarting the sidecar. A missing file means signed out, not
    /// a fault.
    pub fn identity(&self) -> Result<Identity, AuthError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuthError::MissingIdentity)
            }
            Err(e) => return Err(AuthError::Unreadable(e.to_string())),
        };
        let profile: Profile =
            serde_json::from_str(&raw).map_err(|e| AuthError::Unreadable(e.to_string()))?;

        // teacherId is the primary key; older shells only persisted userId.
        let teacher_id = profile
            .teacher_id
            .or(profile.user_id)
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingIdentity)?;
        let token = profile
            .token
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingIdentity)?;

        Ok(Identity { teacher_id, token })
    }
}
