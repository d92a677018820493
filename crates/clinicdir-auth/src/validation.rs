//! Registration input checks, run before any store access.

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Validated registration input. The name is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub password: String,
}

pub fn validate_registration(
    config: &AuthConfig,
    name: &str,
    password: &str,
    confirm: &str,
) -> Result<Registration, AuthError> {
    let name = name.trim();
    if name.chars().count() < config.min_name_len {
        return Err(AuthError::validation(
            "name",
            format!("Name must be at least {} characters", config.min_name_len),
        ));
    }
    if password.chars().count() < config.min_password_len {
        return Err(AuthError::validation(
            "password",
            format!(
                "Password must be at least {} characters",
                config.min_password_len
            ),
        ));
    }
    if password != confirm {
        return Err(AuthError::validation("confirm", "Passwords do not match"));
    }
    Ok(Registration {
        name: name.to_string(),
        password: password.to_string(),
    })
}
