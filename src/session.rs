//! The signed-in user, persisted as a JSON file between invocations.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::errors::{AdminError, AdminResult};

pub const SESSION_HOME_ENV: &str = "TEA_ADMIN_HOME";
const SESSION_FILE: &str = "session.json";
const SESSION_DIR: &str = ".tea-admin";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Builds a session from a login response. Accepts either a bare user
    /// object or one wrapped as `{"user": {...}, "token": "..."}`. Without an
    /// expiry in the response the session lasts `ttl_secs`.
    pub fn from_login_response(
        response: &Value,
        now: DateTime<Utc>,
        ttl_secs: i64,
    ) -> AdminResult<Self> {
        let user = response.get("user").unwrap_or(response);

        let id = text_field(user, &["_id", "id"])
            .ok_or_else(|| AdminError::SessionError("login response has no user id".into()))?;
        let email = text_field(user, &["email"]).unwrap_or_default();
        let name = text_field(user, &["name"]).unwrap_or_else(|| email.clone());
        let role = text_field(user, &["role"]);
        let token = text_field(response, &["token", "accessToken"])
            .or_else(|| text_field(user, &["token"]));

        let expires_at = match ["expiry", "expiresAt", "expires_at"]
            .iter()
            .find_map(|key| response.get(*key).or_else(|| user.get(*key)))
            .and_then(parse_expiry)
        {
            Some(expiry) => expiry,
            None => Duration::try_seconds(ttl_secs)
                .and_then(|ttl| now.checked_add_signed(ttl))
                .ok_or_else(|| {
                    AdminError::SessionError(format!("session lifetime of {ttl_secs}s is out of range"))
                })?,
        };

        Ok(Self {
            id,
            name,
            email,
            role,
            token,
            expires_at,
            saved_at: now,
        })
    }
}

fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|field| match field {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Expiry as RFC 3339 text or a Unix timestamp in seconds or milliseconds.
fn parse_expiry(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let ts = n.as_i64()?;
            if ts > 100_000_000_000 {
                Utc.timestamp_millis_opt(ts).single()
            } else {
                Utc.timestamp_opt(ts, 0).single()
            }
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under `$TEA_ADMIN_HOME`, else `$HOME/.tea-admin`.
    pub fn from_env() -> Option<Self> {
        resolve_session_path(
            std::env::var(SESSION_HOME_ENV).ok(),
            std::env::var("HOME").ok(),
        )
        .map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, session: &StoredSession) -> AdminResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, payload)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Reads the stored session, expired or not.
    pub fn load(&self) -> AdminResult<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let session = serde_json::from_str(&data).map_err(|e| {
            AdminError::SessionError(format!(
                "failed to parse session file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(session))
    }

    /// The stored session if it has not expired.
    pub fn current(&self) -> AdminResult<Option<StoredSession>> {
        self.current_at(Utc::now())
    }

    pub fn current_at(&self, now: DateTime<Utc>) -> AdminResult<Option<StoredSession>> {
        match self.load()? {
            Some(session) if session.is_expired(now) => {
                info!(expired_at = %session.expires_at, "Stored session has expired");
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Deletes the session file. Returns whether one existed.
    pub fn clear(&self) -> AdminResult<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            return Ok(true);
        }
        Ok(false)
    }
}

fn resolve_session_path(home_override: Option<String>, home: Option<String>) -> Option<PathBuf> {
    if let Some(dir) = home_override.filter(|dir| !dir.trim().is_empty()) {
        let names_directory = dir.ends_with(std::path::is_separator);
        let mut path = PathBuf::from(dir);
        if names_directory || path.file_name().is_none() || path.is_dir() {
            path.push(SESSION_FILE);
        }
        return Some(path);
    }

    home.map(|home| {
        let mut path = PathBuf::from(home);
        path.push(SESSION_DIR);
        path.push(SESSION_FILE);
        path
    })
}

/// Signs in and persists the resulting session.
pub async fn login(
    client: &ApiClient,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> AdminResult<StoredSession> {
    let response = client.login(email, password).await?;
    let session = StoredSession::from_login_response(
        &response,
        Utc::now(),
        client.config().session_ttl_secs,
    )?;
    store.save(&session)?;
    info!(user = %session.email, "Signed in");
    Ok(session)
}

pub fn logout(store: &SessionStore) -> AdminResult<bool> {
    let removed = store.clear()?;
    if removed {
        info!("Signed out");
    } else {
        warn!("No stored session to sign out of");
    }
    Ok(removed)
}
