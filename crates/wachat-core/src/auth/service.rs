//! Local identity provider.
//!
//! Owns the current session and publishes every change through a
//! `tokio::sync::watch` channel. Sign-in issues a session with a fixed
//! lifetime and persists it so the next process start can restore it.

use chrono::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

use wachat_types::error::{AuthError, RepositoryError};
use wachat_types::session::{Account, Session, UserId};

use crate::repository::account::AccountRepository;
use crate::repository::session::SessionPersistence;

use super::hash::PasswordHasher;
use super::store::SessionStore;
use super::validation::{normalize_email, validate_password};

/// Generic over the account store, the password hasher, and session
/// persistence. wachat-core never depends on wachat-infra.
pub struct AuthService<A: AccountRepository, H: PasswordHasher, S: SessionPersistence> {
    accounts: A,
    hasher: H,
    persistence: S,
    ttl: Duration,
    session_tx: watch::Sender<Option<Session>>,
}

impl<A: AccountRepository, H: PasswordHasher, S: SessionPersistence> AuthService<A, H, S> {
    /// Starts signed out. Call [`restore`](Self::restore) to pick up a
    /// persisted session.
    pub fn new(accounts: A, hasher: H, persistence: S, ttl: Duration) -> Self {
        let (session_tx, _) = watch::channel(None);
        Self {
            accounts,
            hasher,
            persistence,
            ttl,
            session_tx,
        }
    }

    /// Load the persisted session. An expired one is cleared and ignored.
    pub async fn restore(&self) -> Result<Option<Session>, AuthError> {
        let session = match self.persistence.load().await? {
            Some(session) if session.is_expired() => {
                debug!(user_id = %session.user_id, "persisted session expired");
                self.persistence.clear().await?;
                None
            }
            other => other,
        };
        self.publish(session.clone());
        Ok(session)
    }

    /// Create an account. Does not sign in.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = normalize_email(email)?;
        validate_password(password)?;

        let account = Account {
            id: UserId::generate(),
            email: email.clone(),
            password_hash: self.hasher.hash(password)?,
            created_at: chrono::Utc::now(),
        };

        self.accounts.create(&account).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::EmailTaken(email.clone()),
            other => AuthError::from(other),
        })?;

        info!(user_id = %account.id, "account created");
        Ok(account)
    }

    /// Verify credentials, then issue, persist, and publish a new session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email)?;
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::issue(account.id, account.email, self.ttl);
        self.persistence.save(&session).await?;
        self.publish(Some(session.clone()));
        info!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    /// Clear the session. Signing out while signed out is a no-op.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.persistence.clear().await?;
        if self.session_tx.borrow().is_some() {
            info!("signed out");
        }
        self.publish(None);
        Ok(())
    }

    /// Re-issue the current session with a fresh lifetime.
    pub async fn refresh(&self) -> Result<Session, AuthError> {
        let current = self.current().ok_or(AuthError::NotSignedIn)?;
        let session = Session::issue(current.user_id, current.email, self.ttl);
        self.persistence.save(&session).await?;
        self.publish(Some(session.clone()));
        debug!(user_id = %session.user_id, expires_at = %session.expires_at, "session refreshed");
        Ok(session)
    }

    /// Publish only real changes so subscribers never see spurious wakeups.
    fn publish(&self, session: Option<Session>) {
        self.session_tx.send_if_modified(|slot| {
            if *slot == session {
                false
            } else {
                *slot = session;
                true
            }
        });
    }
}

impl<A: AccountRepository, H: PasswordHasher, S: SessionPersistence> SessionStore
    for AuthService<A, H, S>
{
    fn current(&self) -> Option<Session> {
        self.session_tx
            .borrow()
            .as_ref()
            .filter(|s| !s.is_expired())
            .cloned()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session_tx.subscribe()
    }
}
