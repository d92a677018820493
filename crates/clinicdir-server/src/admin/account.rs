//! Admin account and session endpoints.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use clinicdir_auth::{AdminContext, AuthError, BearerAuth, IssuedSession};
use serde::Deserialize;

use super::state::AdminState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// POST /register - Create an admin account.
pub async fn register(
    State(state): State<AdminState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let admin = state
        .accounts
        .register(&request.name, &request.password, &request.confirm_password)
        .await?;
    Ok((StatusCode::CREATED, Json(admin)))
}

/// POST /login - Verify credentials and issue a session token.
pub async fn login(
    State(state): State<AdminState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<IssuedSession>, AuthError> {
    let issued = state.accounts.login(&request.name, &request.password).await?;
    Ok(Json(issued))
}

/// POST /logout - End the presented session.
pub async fn logout(
    State(state): State<AdminState>,
    BearerAuth(admin): BearerAuth,
) -> Result<StatusCode, AuthError> {
    state.accounts.logout(&admin.token)?;
    tracing::info!(admin = %admin.name, "Admin logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /session - The admin behind the token and when the session expires.
pub async fn session(BearerAuth(admin): BearerAuth) -> Json<AdminContext> {
    Json(admin)
}
