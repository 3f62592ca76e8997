//! OS keychain credential source.
//!
//! Uses the `keyring` crate (macOS Keychain, Linux Secret Service, Windows
//! Credential Manager). Entries live under the service name "wachat" with the
//! credential key as the user name.

use wachat_core::repository::credential::CredentialSource;
use wachat_types::error::RepositoryError;

pub struct KeychainCredentialSource {
    service_name: String,
}

impl KeychainCredentialSource {
    pub fn new() -> Self {
        Self::with_service("wachat")
    }

    /// Custom service name, mostly for tests.
    pub fn with_service(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, RepositoryError> {
        keyring::Entry::new(&self.service_name, key)
            .map_err(|e| RepositoryError::Query(format!("keychain entry error: {e}")))
    }
}

impl Default for KeychainCredentialSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for KeychainCredentialSource {
    fn name(&self) -> &str {
        "keychain"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(RepositoryError::Query(format!("keychain get error: {e}"))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| RepositoryError::Query(format!("keychain set error: {e}")))
    }

    async fn delete(&self, key: &str) -> Result<(), RepositoryError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Err(RepositoryError::NotFound),
            Err(e) => Err(RepositoryError::Query(format!("keychain delete error: {e}"))),
        }
    }
}
