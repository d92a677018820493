//! Admin authentication configuration.

use serde::{Deserialize, Serialize};

/// Settings for admin registration and sessions.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// session_ttl_hours = 24
/// min_name_len = 3
/// min_password_len = 8
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// How long a login stays valid.
    pub session_ttl_hours: u64,

    /// Minimum admin name length, in characters.
    pub min_name_len: usize,

    /// Minimum password length, in characters.
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24,
            min_name_len: 3,
            min_password_len: 8,
        }
    }
}

impl AuthConfig {
    pub fn session_ttl(&self) -> time::Duration {
        time::Duration::hours(i64::try_from(self.session_ttl_hours).unwrap_or(i64::MAX / 3600))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.session_ttl_hours == 0 {
            return Err("auth.session_ttl_hours must be greater than 0".into());
        }
        if self.min_password_len == 0 {
            return Err("auth.min_password_len must be greater than 0".into());
        }
        Ok(())
    }
}
