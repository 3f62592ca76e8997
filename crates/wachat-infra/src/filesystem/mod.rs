//! Data directory layout.
//!
//! Everything wachat keeps on disk lives under one directory:
//! `wachat.db`, `session.json`, and `config.toml`.

use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "WACHAT_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `WACHAT_DATA_DIR` environment variable
/// 2. `~/.wachat`
/// 3. `./.wachat` when no home directory is known
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".wachat");
    }

    PathBuf::from(".wachat")
}

/// Create the data directory if it does not exist yet.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}
