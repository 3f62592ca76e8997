//! Identity types: user ids, sign-in sessions, and local accounts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

use crate::error::ValidationError;

/// Opaque identity scoping message ownership and persistence queries.
///
/// Never empty: constructing one from an empty string fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyIdentity);
        }
        Ok(Self(id))
    }

    /// Fresh random identity for a new account.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// An authenticated sign-in.
///
/// Created on successful sign-in, destroyed on sign-out or once `expires_at`
/// has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: UserId,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a session for `user_id` valid for `ttl` from now.
    pub fn issue(user_id: UserId, email: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            email: email.into(),
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// A local account known to the identity provider.
///
/// `password_hash` is an Argon2 PHC string; plaintext is never stored.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
        assert_eq!(UserId::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_user_id_serde_validates() {
        let parsed: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let parsed: UserId = serde_json::from_str("\"u-42\"").unwrap();
        assert_eq!(parsed.as_str(), "u-42");
    }

    #[test]
    fn test_session_expiry() {
        let session = Session::issue(UserId::generate(), "a@b.fr", Duration::hours(1));
        assert!(!session.is_expired());
        assert!(session.is_expired_at(session.expires_at));
        assert!(session.is_expired_at(session.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_session_json_roundtrip() {
        let session = Session::issue(UserId::generate(), "a@b.fr", Duration::hours(24));
        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
