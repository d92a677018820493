use thiserror::Error;

/// Core error types for directory operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid rating: {0} (expected one of A, B, C, D)")]
    InvalidRating(String),

    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Invalid entity kind: {0}")]
    InvalidEntityKind(String),

    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Create a new InvalidRating error
    pub fn invalid_rating(value: impl Into<String>) -> Self {
        Self::InvalidRating(value.into())
    }

    /// Create a new InvalidId error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a validation error for a single field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for the "required field is blank" validation error
    pub fn required(field: &'static str) -> Self {
        Self::validation(field, "is required")
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRating(_)
                | Self::InvalidId(_)
                | Self::InvalidEntityKind(_)
                | Self::Validation { .. }
                | Self::JsonError(_)
        )
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRating(_)
            | Self::InvalidId(_)
            | Self::InvalidEntityKind(_)
            | Self::Validation { .. } => ErrorCategory::Validation,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::TimeError(_) => ErrorCategory::System,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Serialization,
    System,
    Configuration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Serialization => write!(f, "serialization"),
            Self::System => write!(f, "system"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = CoreError::required("name");
        assert_eq!(err.to_string(), "name: is required");
        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_invalid_rating_error() {
        let err = CoreError::invalid_rating("E");
        assert_eq!(
            err.to_string(),
            "Invalid rating: E (expected one of A, B, C, D)"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_configuration_error_is_not_client_error() {
        let err = CoreError::configuration("missing url");
        assert!(!err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.category().to_string(), "configuration");
    }
}
