//! SQLite account repository for the local identity provider.

use sqlx::Row;

use wachat_core::repository::account::AccountRepository;
use wachat_types::error::RepositoryError;
use wachat_types::session::{Account, UserId};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

pub struct SqliteAccountRepository {
    pool: DatabasePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AccountRow {
    id: String,
    email: String,
    password_hash: String,
    created_at: String,
}

impl AccountRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_account(self) -> Result<Account, RepositoryError> {
        Ok(Account {
            id: UserId::new(self.id)
                .map_err(|e| RepositoryError::Query(format!("invalid account id: {e}")))?,
            email: self.email,
            password_hash: self.password_hash,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl AccountRepository for SqliteAccountRepository {
    async fn create(&self, account: &Account) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO accounts (id, email, password_hash, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(account.id.as_str())
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(format_datetime(&account.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("email '{}' already registered", account.email)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let account_row =
                    AccountRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(account_row.into_account()?))
            }
            None => Ok(None),
        }
    }
}
