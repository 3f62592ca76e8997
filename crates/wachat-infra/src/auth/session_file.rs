//! Session persistence as a JSON file in the data directory.

use std::path::{Path, PathBuf};

use wachat_core::repository::session::SessionPersistence;
use wachat_types::error::RepositoryError;
use wachat_types::session::Session;

pub const SESSION_FILE: &str = "session.json";

pub struct FileSessionPersistence {
    path: PathBuf,
}

impl FileSessionPersistence {
    /// Persist to `{data_dir}/session.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionPersistence for FileSessionPersistence {
    async fn load(&self) -> Result<Option<Session>, RepositoryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(RepositoryError::Query(format!("read session file: {err}"))),
        };

        match serde_json::from_str::<Session>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                // Corrupt file reads as signed out.
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    async fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::Query(format!("create data dir: {e}")))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| RepositoryError::Query(format!("encode session: {e}")))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| RepositoryError::Query(format!("write session file: {e}")))
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(RepositoryError::Query(format!("remove session file: {err}"))),
        }
    }
}
