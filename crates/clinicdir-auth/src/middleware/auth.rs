//! Bearer token authentication extractor.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use clinicdir_auth::middleware::{AuthState, BearerAuth};
//!
//! async fn protected_handler(BearerAuth(admin): BearerAuth) -> String {
//!     format!("Hello, {}!", admin.name)
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .with_state(auth_state);
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AuthError;
use crate::session::SessionRegistry;

/// State required for bearer token authentication.
///
/// Include it in the application state and expose it via `FromRef`.
#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<SessionRegistry>,
}

impl AuthState {
    pub fn new(sessions: Arc<SessionRegistry>) -> Self {
        Self { sessions }
    }
}

/// The authenticated admin behind a request.
#[derive(Debug, Clone, Serialize)]
pub struct AdminContext {
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    /// The presented token, needed to end the session on logout.
    #[serde(skip)]
    pub token: String,
}

/// Axum extractor that requires a live admin session.
///
/// Reads `Authorization: Bearer <token>` and resolves it through the
/// session registry, which drops the session if it has expired.
pub struct BearerAuth(pub AdminContext);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AuthError::unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::unauthorized("Expected a Bearer token"))?;

        let identity = auth_state.sessions.check(token)?;

        tracing::debug!(admin = %identity.name, "Admin session validated");

        Ok(BearerAuth(AdminContext {
            name: identity.name,
            expires_at: identity.expires_at,
            token: token.to_string(),
        }))
    }
}
