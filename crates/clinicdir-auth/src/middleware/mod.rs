//! HTTP middleware for admin authentication.
//!
//! - Bearer token extraction and session validation
//! - JSON error responses for auth failures

pub mod auth;
pub mod error;

pub use auth::{AdminContext, AuthState, BearerAuth};
pub use error::status_for;
