use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clinicdir_core::{CoreError, ReferenceViolation, Referent};
use clinicdir_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// -------------------------
// Response envelopes
// -------------------------

/// Body of `GET /api/{entity}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionResponse<T> {
    pub data: Vec<T>,
    /// `true` when served from the cache.
    pub cached: bool,
    /// Retrieval time, epoch milliseconds.
    pub timestamp: i64,
}

/// Body of `POST /api/{entity}` (forced refresh).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshResponse<T> {
    pub data: Vec<T>,
    pub refreshed: bool,
    pub timestamp: i64,
}

impl<T> RefreshResponse<T> {
    pub fn new(data: Vec<T>, timestamp: i64) -> Self {
        Self {
            data,
            refreshed: true,
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
            storage: None,
            cache: None,
        }
    }
}

/// Which entity blocked a deletion, and how many doctors still point at it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockedBy {
    pub kind: String,
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// JSON error body: `{"error": "..."}`, plus `blocked_by` for refused deletions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<BlockedBy>,
}

// -------------------------
// Error Types
// -------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Blocked(ReferenceViolation),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }
    /// An internal failure. `msg` is what the client sees; log details separately.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) | ApiError::Blocked(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The body sent to the client. Only the human-readable message is
    /// exposed, never the variant prefix.
    pub fn to_body(&self) -> ErrorBody {
        let (error, blocked_by) = match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::ServiceUnavailable(msg)
            | ApiError::Internal(msg) => (msg.clone(), None),
            ApiError::Blocked(violation) => (
                violation.to_string(),
                Some(BlockedBy {
                    kind: violation.kind.as_str().to_string(),
                    id: violation.id.clone(),
                    name: violation.name.clone(),
                    count: violation.count,
                }),
            ),
        };
        ErrorBody { error, blocked_by }
    }

    /// Maps a storage failure, replacing internal details with `context`.
    ///
    /// Client-caused storage errors keep their own message; everything else
    /// is logged at `error` and reported as `context`.
    pub fn from_storage(err: StorageError, context: &str) -> Self {
        match err {
            StorageError::NotFound { kind, id } => {
                ApiError::NotFound(format!("{} not found: {id}", capitalize(&kind)))
            }
            StorageError::AlreadyExists { .. } => ApiError::Conflict(err.to_string()),
            StorageError::InvalidReference { .. } => ApiError::BadRequest(err.to_string()),
            StorageError::Referenced(violation) => ApiError::Blocked(violation),
            other => {
                tracing::error!(error = %other, category = %other.category(), "{context}");
                ApiError::Internal(context.to_string())
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            tracing::error!(error = %err, category = %err.category(), "Core error");
            ApiError::Internal("Internal server error".into())
        }
    }
}

impl From<ReferenceViolation> for ApiError {
    fn from(violation: ReferenceViolation) -> Self {
        ApiError::Blocked(violation)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

/// Convenience for building a blocked-deletion error in tests and callers.
pub fn blocked(kind: Referent, id: &str, name: &str, count: usize) -> ApiError {
    ApiError::Blocked(ReferenceViolation {
        kind,
        id: id.to_string(),
        name: name.to_string(),
        count,
    })
}
