//! Application state wiring all services together.
//!
//! The core services are generic over repository/hasher/persistence traits;
//! AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use wachat_core::auth::AuthService;
use wachat_core::llm::box_provider::BoxCompletionProvider;
use wachat_core::repository::credential::CredentialChain;
use wachat_infra::auth::{Argon2PasswordHasher, FileSessionPersistence};
use wachat_infra::config::{load_global_config, session_ttl};
use wachat_infra::credential::build_credential_chain;
use wachat_infra::credential::keychain::KeychainCredentialSource;
use wachat_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use wachat_infra::llm::{create_provider, resolve_api_key};
use wachat_infra::sqlite::account::SqliteAccountRepository;
use wachat_infra::sqlite::message::SqliteMessageRepository;
use wachat_infra::sqlite::pool::DatabasePool;
use wachat_types::config::GlobalConfig;

pub type ConcreteAuthService =
    AuthService<SqliteAccountRepository, Argon2PasswordHasher, FileSessionPersistence>;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<ConcreteAuthService>,
    pub credentials: Arc<CredentialChain>,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Connect to the database, load config, and restore any saved session.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;

        let config = load_global_config(&data_dir).await;
        let db_pool = DatabasePool::open_in(&data_dir).await?;

        let auth = AuthService::new(
            SqliteAccountRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            FileSessionPersistence::in_dir(&data_dir),
            session_ttl(&config),
        );
        auth.restore().await?;

        let credentials = build_credential_chain(Some(KeychainCredentialSource::new()));
        debug!(data_dir = %data_dir.display(), "application state ready");

        Ok(Self {
            auth: Arc::new(auth),
            credentials: Arc::new(credentials),
            config,
            data_dir,
            db_pool,
        })
    }

    pub fn message_repository(&self) -> SqliteMessageRepository {
        SqliteMessageRepository::new(self.db_pool.clone())
    }

    /// Build the completion provider. A missing API key is not an error
    /// here; the provider reports it on first use.
    pub async fn completion_provider(&self) -> BoxCompletionProvider {
        let api_key = resolve_api_key(&self.config, &self.credentials).await;
        create_provider(&self.config, api_key)
    }
}
