//! HTTP responses for authentication errors.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        let message = if self.is_server_error() {
            tracing::error!(error = %self, "Admin authentication failed internally");
            "Authentication service unavailable".to_string()
        } else {
            self.to_string()
        };

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            headers.insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"clinicdir-admin\""),
            );
        }

        (status, headers, Json(json!({ "error": message }))).into_response()
    }
}

/// HTTP status for an auth error.
pub fn status_for(error: &AuthError) -> StatusCode {
    match error {
        AuthError::Validation { .. } => StatusCode::BAD_REQUEST,
        AuthError::NameTaken { .. } => StatusCode::CONFLICT,
        AuthError::InvalidCredentials
        | AuthError::Unauthorized { .. }
        | AuthError::SessionExpired => StatusCode::UNAUTHORIZED,
        AuthError::Storage { .. } | AuthError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&AuthError::validation("name", "short")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AuthError::NameTaken { name: "a".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&AuthError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let res = AuthError::unauthorized("no token").into_response();
        assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
    }
}
