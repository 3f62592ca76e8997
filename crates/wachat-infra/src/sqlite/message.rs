//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `wachat-core`: inserts go through the
//! writer pool, history reads through the reader pool, ordered by `seq`.

use sqlx::Row;
use uuid::Uuid;

use wachat_core::repository::message::MessageRepository;
use wachat_types::error::RepositoryError;
use wachat_types::message::{MessageId, MessageRole, NewMessage, StoredMessage};
use wachat_types::session::UserId;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct MessageRow {
    seq: i64,
    id: String,
    owner: String,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            seq: row.try_get("seq")?,
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<StoredMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let owner = UserId::new(self.owner)
            .map_err(|e| RepositoryError::Query(format!("invalid owner: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(StoredMessage {
            seq: self.seq,
            id: MessageId(id),
            owner,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn insert(&self, message: &NewMessage) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO messages (id, owner, role, content, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.owner.as_str())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("message '{}' already stored", message.id)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn select_all(&self, owner: &UserId) -> Result<Vec<StoredMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT seq, id, owner, role, content, created_at FROM messages WHERE owner = ? ORDER BY seq ASC",
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                MessageRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_message()
            })
            .collect()
    }
}
