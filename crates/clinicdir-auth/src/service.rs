//! Admin registration and login.

use std::sync::Arc;

use clinicdir_core::Admin;
use clinicdir_storage::{DynStorage, StorageError};
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::{hash_password, verify_password};
use crate::session::{IssuedSession, SessionRegistry};
use crate::validation::validate_registration;

/// Ties admin storage, password hashing and the session registry together.
#[derive(Clone)]
pub struct AdminAuthService {
    storage: DynStorage,
    sessions: Arc<SessionRegistry>,
    config: AuthConfig,
}

impl AdminAuthService {
    pub fn new(storage: DynStorage, config: AuthConfig) -> Self {
        let sessions = Arc::new(SessionRegistry::new(config.session_ttl()));
        Self {
            storage,
            sessions,
            config,
        }
    }

    pub fn sessions(&self) -> Arc<SessionRegistry> {
        self.sessions.clone()
    }

    /// Creates an admin account.
    ///
    /// Input is validated before the store is touched. The name is checked
    /// for uniqueness up front; the store's own unique constraint settles
    /// races between concurrent registrations.
    pub async fn register(
        &self,
        name: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Admin, AuthError> {
        let registration = validate_registration(&self.config, name, password, confirm)?;

        if self.storage.find_admin(&registration.name).await?.is_some() {
            return Err(AuthError::NameTaken {
                name: registration.name,
            });
        }

        let hash = hash_blocking(registration.password).await?;
        let admin = self
            .storage
            .create_admin(&registration.name, &hash)
            .await
            .map_err(|e| match e {
                StorageError::AlreadyExists { key, .. } => AuthError::NameTaken { name: key },
                other => other.into(),
            })?;

        info!(admin = %admin.name, "Admin account registered");
        Ok(admin)
    }

    /// Verifies credentials and starts a session.
    pub async fn login(&self, name: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let name = name.trim();
        let Some(admin) = self.storage.find_admin(name).await? else {
            warn!(admin = %name, "Login attempt for unknown admin");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_blocking(password.to_string(), admin.password_hash).await? {
            warn!(admin = %name, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.sessions.issue(&admin.name);
        info!(admin = %admin.name, expires_at = %issued.expires_at, "Admin logged in");
        Ok(issued)
    }

    /// Ends the session behind `token`.
    pub fn logout(&self, token: &str) -> Result<(), AuthError> {
        if self.sessions.revoke(token) {
            Ok(())
        } else {
            Err(AuthError::unauthorized("Unknown session"))
        }
    }
}

async fn hash_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::internal(format!("Hashing task failed: {e}")))?
        .map_err(|e| AuthError::internal(format!("Password hashing failed: {e}")))
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::internal(format!("Verification task failed: {e}")))?
        .map_err(|e| AuthError::internal(format!("Stored password hash is invalid: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicdir_db_memory::InMemoryStorage;

    fn service() -> AdminAuthService {
        AdminAuthService::new(Arc::new(InMemoryStorage::new()), AuthConfig::default())
    }

    #[tokio::test]
    async fn register_then_login_issues_session() {
        let svc = service();
        let admin = svc.register("admin", "password1", "password1").await.unwrap();
        assert!(admin.password_hash.starts_with("$argon2id$"));

        let issued = svc.login("admin", "password1").await.unwrap();
        let identity = svc.sessions().check(&issued.token).unwrap();
        assert_eq!(identity.name, "admin");

        svc.logout(&issued.token).unwrap();
        assert!(svc.sessions().check(&issued.token).is_err());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let svc = service();
        svc.register("admin", "password1", "password1").await.unwrap();
        let err = svc
            .register("admin", "password2", "password2")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NameTaken { .. }));
    }

    #[tokio::test]
    async fn validation_runs_before_storage() {
        let svc = service();
        let err = svc.register("ab", "password1", "password1").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation { .. }));
        assert!(svc.storage.find_admin("ab").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_admin_look_the_same() {
        let svc = service();
        svc.register("admin", "password1", "password1").await.unwrap();
        let a = svc.login("admin", "nope-nope").await.unwrap_err();
        let b = svc.login("ghost", "password1").await.unwrap_err();
        assert_eq!(a.to_string(), b.to_string());
        assert!(svc.sessions().is_empty());
    }
}
