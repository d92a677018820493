use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("ID must not be empty")]
    Empty,
    #[error("ID is longer than {max} characters")]
    TooLong { max: usize },
    #[error("ID contains invalid character {0:?}")]
    InvalidChar(char),
}

const MAX_ID_LEN: usize = 64;

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Ids are opaque, but they travel in URL paths and cache payloads, so only
/// ASCII alphanumerics, `-`, `_` and `.` are accepted.
pub fn validate_id(id: &str) -> Result<(), IdError> {
    if id.is_empty() {
        return Err(IdError::Empty);
    }
    if id.len() > MAX_ID_LEN {
        return Err(IdError::TooLong { max: MAX_ID_LEN });
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(IdError::InvalidChar(c));
    }
    Ok(())
}
