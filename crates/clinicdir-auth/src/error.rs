//! Authentication error types.

use std::fmt;

use clinicdir_storage::StorageError;

/// Errors that can occur during admin registration, login and session checks.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A registration or login field failed validation.
    #[error("{message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// An admin with this name already exists.
    #[error("Admin name '{name}' is already taken")]
    NameTaken {
        /// The requested name.
        name: String,
    },

    /// Name or password did not match.
    #[error("Invalid name or password")]
    InvalidCredentials,

    /// The request lacks a usable session token.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The session existed but is older than the session TTL.
    #[error("Session expired")]
    SessionExpired,

    /// An error occurred while storing or retrieving admin data.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the caller caused the error.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !self.is_server_error()
    }

    /// Returns `true` if the error is a server-side failure.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Internal { .. })
    }

    /// Returns `true` if the error should yield 401.
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::Unauthorized { .. } | Self::SessionExpired
        )
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::NameTaken { .. } => ErrorCategory::Conflict,
            Self::InvalidCredentials | Self::Unauthorized { .. } | Self::SessionExpired => {
                ErrorCategory::Authentication
            }
            Self::Storage { .. } | Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        Self::Storage {
            message: err.to_string(),
        }
    }
}

/// Categories of auth errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Authentication,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Conflict => write!(f, "conflict"),
            Self::Authentication => write!(f, "authentication"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
