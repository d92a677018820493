use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Admin session token returned by `POST /api/admin/login`, kept per profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub server: String,
    pub name: String,
    pub token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl StoredSession {
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    /// First and last few characters of the token.
    pub fn token_preview(&self) -> String {
        let token = &self.token;
        if token.len() > 20 {
            format!("{}...{}", &token[..8], &token[token.len() - 8..])
        } else {
            token.clone()
        }
    }
}

fn session_path(dir: &Path, profile: &str) -> PathBuf {
    dir.join(format!("session.{profile}.json"))
}

pub fn load_session_in(dir: &Path, profile: &str) -> Result<Option<StoredSession>> {
    let path = session_path(dir, profile);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let session: StoredSession = serde_json::from_str(&content)?;
    Ok(Some(session))
}

pub fn save_session_in(dir: &Path, profile: &str, session: &StoredSession) -> Result<()> {
    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_path(dir, profile), content)?;
    Ok(())
}

pub fn remove_session_in(dir: &Path, profile: &str) -> Result<bool> {
    let path = session_path(dir, profile);
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

pub fn load_session(profile: &str) -> Result<Option<StoredSession>> {
    load_session_in(&crate::config::config_dir()?, profile)
}

pub fn save_session(profile: &str, session: &StoredSession) -> Result<()> {
    save_session_in(&crate::config::config_dir()?, profile, session)
}

pub fn remove_session(profile: &str) -> Result<bool> {
    remove_session_in(&crate::config::config_dir()?, profile)
}

/// The stored token, unless it has already expired.
pub fn active_token(profile: &str) -> Result<Option<String>> {
    Ok(load_session(profile)?
        .filter(|s| !s.is_expired_at(OffsetDateTime::now_utc()))
        .map(|s| s.token))
}
