//! Admin API endpoints.
//!
//! # Endpoints
//!
//! ## Account
//!
//! - `POST /register` - Create an admin account
//! - `POST /login` - Start a session, returns a bearer token
//! - `POST /logout` - End the current session
//! - `GET /session` - Describe the current session
//!
//! ## Roster
//!
//! - `GET /doctors?page=` - Paginated doctor listing
//! - `POST /doctors`, `PUT /doctors/{id}`, `DELETE /doctors/{id}`
//! - `POST /hospitals`, `PUT /hospitals/{id}`, `DELETE /hospitals/{id}`
//! - `POST /departments`, `PUT /departments/{id}`, `DELETE /departments/{id}`
//!
//! Everything except `register` and `login` requires `Authorization: Bearer`.

pub mod account;
pub mod roster;
pub mod state;

pub use account::{login, logout, register, session};
pub use roster::{
    create_department, create_doctor, create_hospital, delete_department, delete_doctor,
    delete_hospital, list_doctors, update_department, update_doctor, update_hospital,
};
pub use state::AdminState;

use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post, put};

use clinicdir_auth::AuthState;

/// Creates the admin routes, to be nested under `/api/admin`.
pub fn admin_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    AuthState: FromRef<S>,
    AdminState: FromRef<S>,
{
    Router::new()
        // Account endpoints
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session))
        // Roster endpoints
        .route("/doctors", get(list_doctors).post(create_doctor))
        .route("/doctors/{id}", put(update_doctor).delete(delete_doctor))
        .route("/hospitals", post(create_hospital))
        .route(
            "/hospitals/{id}",
            put(update_hospital).delete(delete_hospital),
        )
        .route("/departments", post(create_department))
        .route(
            "/departments/{id}",
            put(update_department).delete(delete_department),
        )
}
