//! Environment variable credential source.
//!
//! Read-only and highest priority: a variable named after the key (e.g.
//! `OPENAI_API_KEY`) overrides anything stored in the keychain.

use wachat_core::repository::credential::CredentialSource;
use wachat_types::error::RepositoryError;

#[derive(Debug, Default)]
pub struct EnvCredentialSource;

impl EnvCredentialSource {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialSource for EnvCredentialSource {
    fn name(&self) -> &str {
        "env"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        match std::env::var(key) {
            Ok(val) if !val.trim().is_empty() => Ok(Some(val)),
            // Set-but-blank and non-Unicode values count as absent.
            Ok(_) | Err(std::env::VarError::NotPresent) | Err(std::env::VarError::NotUnicode(_)) => {
                Ok(None)
            }
        }
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Query(
            "environment credential source is read-only".to_string(),
        ))
    }

    async fn delete(&self, _key: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Query(
            "environment credential source is read-only".to_string(),
        ))
    }
}
