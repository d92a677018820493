//! Admin sessions.
//!
//! A session is an explicit value, [`AdminSession`], stored in a
//! [`SessionRegistry`] under an opaque bearer token. Expiry is checked lazily
//! whenever a token is presented; expired entries are dropped at that point.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::error::AuthError;

/// The state behind one bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub authenticated: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
}

impl AdminSession {
    pub fn new(issued_at: OffsetDateTime) -> Self {
        Self {
            authenticated: true,
            issued_at,
        }
    }

    /// Valid while authenticated and no older than `ttl` (inclusive).
    pub fn is_valid_at(&self, now: OffsetDateTime, ttl: Duration) -> bool {
        self.authenticated && now - self.issued_at <= ttl
    }

    pub fn expires_at(&self, ttl: Duration) -> OffsetDateTime {
        self.issued_at + ttl
    }
}

/// The admin a valid token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminIdentity {
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Token handed back to the client after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedSession {
    pub token: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    admin: String,
    session: AdminSession,
}

/// In-process registry of live sessions.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a session for `admin` and returns its token.
    pub fn issue(&self, admin: &str) -> IssuedSession {
        self.issue_at(admin, OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, admin: &str, now: OffsetDateTime) -> IssuedSession {
        self.purge_expired(now);
        let token = uuid::Uuid::new_v4().to_string();
        let session = AdminSession::new(now);
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                admin: admin.to_string(),
                session,
            },
        );
        IssuedSession {
            token,
            name: admin.to_string(),
            expires_at: session.expires_at(self.ttl),
        }
    }

    /// Resolves a token to its admin, dropping it if it has expired.
    pub fn check(&self, token: &str) -> Result<AdminIdentity, AuthError> {
        self.check_at(token, OffsetDateTime::now_utc())
    }

    pub fn check_at(&self, token: &str, now: OffsetDateTime) -> Result<AdminIdentity, AuthError> {
        let entry = self
            .sessions
            .get(token)
            .map(|e| e.value().clone())
            .ok_or_else(|| AuthError::unauthorized("Unknown session"))?;

        if !entry.session.is_valid_at(now, self.ttl) {
            self.sessions.remove(token);
            tracing::debug!(admin = %entry.admin, "Session expired");
            return Err(AuthError::SessionExpired);
        }

        Ok(AdminIdentity {
            name: entry.admin,
            expires_at: entry.session.expires_at(self.ttl),
        })
    }

    /// Ends a session. Returns `false` if the token was unknown.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drops every expired session and returns how many were removed.
    pub fn purge_expired(&self, now: OffsetDateTime) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.session.is_valid_at(now, self.ttl));
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2024-05-01 09:00 UTC);

    #[test]
    fn session_valid_up_to_ttl_inclusive() {
        let session = AdminSession::new(T0);
        let ttl = Duration::hours(24);
        assert!(session.is_valid_at(T0 + Duration::hours(23), ttl));
        assert!(session.is_valid_at(T0 + ttl, ttl));
        assert!(!session.is_valid_at(T0 + ttl + Duration::seconds(1), ttl));
    }

    #[test]
    fn unauthenticated_session_is_never_valid() {
        let session = AdminSession {
            authenticated: false,
            issued_at: T0,
        };
        assert!(!session.is_valid_at(T0, Duration::hours(24)));
    }

    #[test]
    fn registry_checks_expiry_lazily() {
        let registry = SessionRegistry::new(Duration::hours(24));
        let issued = registry.issue_at("admin", T0);
        assert_eq!(issued.expires_at, T0 + Duration::hours(24));

        let identity = registry
            .check_at(&issued.token, T0 + Duration::hours(1))
            .unwrap();
        assert_eq!(identity.name, "admin");

        let err = registry
            .check_at(&issued.token, T0 + Duration::hours(25))
            .unwrap_err();
        assert!(matches!(err, AuthError::SessionExpired));
        assert!(registry.is_empty());

        let err = registry.check_at(&issued.token, T0).unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
    }

    #[test]
    fn revoke_and_purge() {
        let registry = SessionRegistry::new(Duration::hours(1));
        let a = registry.issue_at("a", T0);
        registry.issue_at("b", T0 + Duration::minutes(50));
        assert!(registry.revoke(&a.token));
        assert!(!registry.revoke(&a.token));

        registry.issue_at("c", T0);
        assert_eq!(registry.purge_expired(T0 + Duration::minutes(90)), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn issuing_drops_abandoned_expired_sessions() {
        let ttl = Duration::hours(24);
        let registry = SessionRegistry::new(ttl);
        registry.issue_at("admin", T0);
        registry.issue_at("admin", T0 + Duration::hours(1));
        assert_eq!(registry.len(), 2);

        let fresh = registry.issue_at("admin", T0 + ttl + Duration::seconds(1));
        assert_eq!(registry.len(), 2);

        let latest = registry.issue_at("admin", T0 + Duration::hours(26));
        assert_eq!(registry.len(), 2);
        assert!(registry.check_at(&fresh.token, T0 + Duration::hours(26)).is_ok());
        assert!(registry.check_at(&latest.token, T0 + Duration::hours(26)).is_ok());
    }
}
