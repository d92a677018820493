//! Storage error types for the directory storage layer.
//!
//! Backends map their native failures into [`StorageError`] so the server
//! never has to know which store it is talking to.

use std::fmt;

use clinicdir_core::ReferenceViolation;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested entity was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Singular entity name, e.g. `hospital`.
        kind: String,
        /// The ID that was looked up.
        id: String,
    },

    /// Attempted to create an entity whose unique key already exists.
    #[error("{kind} already exists: {key}")]
    AlreadyExists {
        /// Singular entity name.
        kind: String,
        /// The conflicting id or unique name.
        key: String,
    },

    /// A foreign key points at a row that does not exist.
    #[error("Unknown {field}: {id}")]
    InvalidReference {
        /// The referencing column, e.g. `hospital_id`.
        field: String,
        /// The dangling id.
        id: String,
    },

    /// Deletion refused because doctors still reference the entity.
    #[error(transparent)]
    Referenced(#[from] ReferenceViolation),

    /// A stored row could not be converted into a domain value.
    #[error("Invalid row: {message}")]
    InvalidRow {
        /// Description of the failed check.
        message: String,
    },

    /// Failed to connect to the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Creates a new `InvalidReference` error.
    #[must_use]
    pub fn invalid_reference(field: impl Into<String>, id: impl Into<String>) -> Self {
        Self::InvalidReference {
            field: field.into(),
            id: id.into(),
        }
    }

    /// Creates a new `InvalidRow` error.
    #[must_use]
    pub fn invalid_row(message: impl Into<String>) -> Self {
        Self::InvalidRow {
            message: message.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
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

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is an already exists error.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns the reference violation if deletion was blocked.
    #[must_use]
    pub fn as_reference_violation(&self) -> Option<&ReferenceViolation> {
        match self {
            Self::Referenced(violation) => Some(violation),
            _ => None,
        }
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } | Self::Referenced(_) => ErrorCategory::Conflict,
            Self::InvalidReference { .. } => ErrorCategory::Validation,
            Self::InvalidRow { .. } => ErrorCategory::Integrity,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Entity not found.
    NotFound,
    /// Unique key or reference conflict.
    Conflict,
    /// Caller supplied bad input.
    Validation,
    /// Stored data failed row checks.
    Integrity,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Integrity => write!(f, "integrity"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicdir_core::Referent;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("hospital", "h1");
        assert_eq!(err.to_string(), "hospital not found: h1");

        let err = StorageError::already_exists("admin", "root");
        assert_eq!(err.to_string(), "admin already exists: root");

        let err = StorageError::invalid_reference("hospital_id", "h9");
        assert_eq!(err.to_string(), "Unknown hospital_id: h9");
    }

    #[test]
    fn test_reference_violation_is_transparent() {
        let err = StorageError::from(ReferenceViolation {
            kind: Referent::Department,
            id: "d1".into(),
            name: "Cardiology".into(),
            count: 3,
        });
        assert_eq!(
            err.to_string(),
            "Cannot delete department 'Cardiology': 3 doctor(s) still reference it"
        );
        assert_eq!(err.as_reference_violation().map(|v| v.count), Some(3));
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[test]
    fn test_error_predicates() {
        let err = StorageError::not_found("doctor", "1");
        assert!(err.is_not_found());
        assert!(!err.is_already_exists());
        assert!(err.as_reference_violation().is_none());
        assert_eq!(
            StorageError::invalid_row("bad rating").category(),
            ErrorCategory::Integrity
        );
    }
}
