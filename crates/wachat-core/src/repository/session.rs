//! SessionPersistence trait definition.
//!
//! Keeps the current sign-in across process restarts so the one-shot
//! "current session" query at startup can restore it.

use wachat_types::error::RepositoryError;
use wachat_types::session::Session;

pub trait SessionPersistence: Send + Sync {
    /// The stored session, if any. Expiry is not checked here.
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    fn save(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove the stored session. Clearing when nothing is stored is not an error.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
