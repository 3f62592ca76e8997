//! Infrastructure layer for wachat.
//!
//! Implements the ports defined in `wachat-core`: SQLite message and account
//! storage, the Argon2 password hasher and session file, credential sources
//! (environment, OS keychain), the OpenAI-compatible completion provider, and
//! config/data-directory loading.

pub mod auth;
pub mod config;
pub mod credential;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
