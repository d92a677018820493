//! # clinicdir-auth
//!
//! Admin authentication for the clinicdir server.
//!
//! ## Modules
//!
//! - [`config`] - Session lifetime and registration rules
//! - [`password`] - Argon2id password hashing
//! - [`validation`] - Registration input checks
//! - [`session`] - `AdminSession` values and the session registry
//! - [`service`] - Registration, login and logout
//! - [`middleware`] - Axum bearer extractor and error responses

pub mod config;
pub mod error;
pub mod middleware;
pub mod password;
pub mod service;
pub mod session;
pub mod validation;

pub use config::AuthConfig;
pub use error::{AuthError, ErrorCategory};
pub use middleware::{AdminContext, AuthState, BearerAuth};
pub use service::AdminAuthService;
pub use session::{AdminIdentity, AdminSession, IssuedSession, SessionRegistry};
pub use validation::{Registration, validate_registration};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;
