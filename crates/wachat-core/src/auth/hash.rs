//! PasswordHasher trait.
//!
//! The Argon2 adapter lives in wachat-infra.

use wachat_types::error::AuthError;

pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing hash string (algorithm, salt, digest).
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}
