//! MessageRepository trait definition.
//!
//! The message store is append-only: rows are inserted and read back in
//! insertion order, never updated or deleted.

use wachat_types::error::RepositoryError;
use wachat_types::message::{NewMessage, StoredMessage};
use wachat_types::session::UserId;

/// Repository trait for chat message persistence.
///
/// Implementations live in wachat-infra (e.g., `SqliteMessageRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MessageRepository: Send + Sync {
    /// Append one message. The message's `id` becomes its stored key.
    fn insert(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Every message owned by `owner`, ascending by creation order.
    ///
    /// No pagination: the full history is returned.
    fn select_all(
        &self,
        owner: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<StoredMessage>, RepositoryError>> + Send;
}
