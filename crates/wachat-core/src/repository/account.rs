//! AccountRepository trait definition.

use wachat_types::error::RepositoryError;
use wachat_types::session::Account;

/// Repository trait for local accounts used by the identity provider.
pub trait AccountRepository: Send + Sync {
    /// Create an account. Returns `RepositoryError::Conflict` if the email
    /// is already registered.
    fn create(
        &self,
        account: &Account,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up an account by email (case-insensitive).
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Account>, RepositoryError>> + Send;
}
