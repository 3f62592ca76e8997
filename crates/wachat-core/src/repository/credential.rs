//! Credential source trait and resolution chain.
//!
//! Sources are queried in priority order (first match wins). The default
//! chain assembled in wachat-infra is `[EnvCredentialSource,
//! KeychainCredentialSource]`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;
use wachat_types::error::RepositoryError;

/// A backend that may hold API credentials (environment, OS keychain).
pub trait CredentialSource: Send + Sync {
    /// Short name for logs (e.g., "env", "keychain").
    fn name(&self) -> &str;

    /// Retrieve a credential by key. `None` if this source does not have it.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Store a credential. Read-only sources return an error.
    fn set(&self, key: &str, value: &str)
    -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove a credential. `RepositoryError::NotFound` if absent.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Object-safe version of [`CredentialSource`] with boxed futures.
pub trait CredentialSourceDyn: Send + Sync {
    fn name(&self) -> &str;

    fn get_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, RepositoryError>> + Send + 'a>>;

    fn set_boxed<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>>;

    fn delete_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>>;
}

impl<T: CredentialSource> CredentialSourceDyn for T {
    fn name(&self) -> &str {
        CredentialSource::name(self)
    }

    fn get_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, RepositoryError>> + Send + 'a>> {
        Box::pin(self.get(key))
    }

    fn set_boxed<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>> {
        Box::pin(self.set(key, value))
    }

    fn delete_boxed<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), RepositoryError>> + Send + 'a>> {
        Box::pin(self.delete(key))
    }
}

/// Shared, type-erased credential source.
pub type DynCredentialSource = Arc<dyn CredentialSourceDyn>;

/// Resolves credentials through a chain of sources in priority order.
pub struct CredentialChain {
    sources: Vec<DynCredentialSource>,
}

impl CredentialChain {
    /// Sources should be ordered by precedence (highest priority first).
    pub fn new(sources: Vec<DynCredentialSource>) -> Self {
        Self { sources }
    }

    /// First value found wins.
    pub async fn resolve(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        for source in &self.sources {
            if let Some(value) = source.get_boxed(key).await? {
                debug!(key, source = source.name(), "credential resolved");
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Store in the first source that accepts writes.
    pub async fn store(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        for source in &self.sources {
            match source.set_boxed(key, value).await {
                Ok(()) => return Ok(()),
                Err(_) => continue,
            }
        }
        Err(RepositoryError::Query(
            "no writable credential source available".to_string(),
        ))
    }

    /// Remove from every source that has it.
    pub async fn remove(&self, key: &str) -> Result<(), RepositoryError> {
        let mut deleted = false;
        for source in &self.sources {
            if source.delete_boxed(key).await.is_ok() {
                deleted = true;
            }
        }
        if deleted {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapSource {
        name: &'static str,
        values: Mutex<HashMap<String, String>>,
        writable: bool,
    }

    impl MapSource {
        fn new(name: &'static str, pairs: &[(&str, &str)], writable: bool) -> Self {
            Self {
                name,
                values: Mutex::new(
                    pairs
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                ),
                writable,
            }
        }
    }

    impl CredentialSource for MapSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
            if !self.writable {
                return Err(RepositoryError::Query("read-only".to_string()));
            }
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), RepositoryError> {
            match self.values.lock().unwrap().remove(key) {
                Some(_) => Ok(()),
                None => Err(RepositoryError::NotFound),
            }
        }
    }

    #[tokio::test]
    async fn first_source_wins() {
        let chain = CredentialChain::new(vec![
            Arc::new(MapSource::new("env", &[("KEY", "from-env")], false)),
            Arc::new(MapSource::new("keychain", &[("KEY", "from-keychain")], true)),
        ]);
        assert_eq!(chain.resolve("KEY").await.unwrap().as_deref(), Some("from-env"));
    }

    #[tokio::test]
    async fn falls_through_to_later_source() {
        let chain = CredentialChain::new(vec![
            Arc::new(MapSource::new("env", &[], false)),
            Arc::new(MapSource::new("keychain", &[("KEY", "from-keychain")], true)),
        ]);
        assert_eq!(
            chain.resolve("KEY").await.unwrap().as_deref(),
            Some("from-keychain")
        );
        assert!(chain.resolve("OTHER").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_skips_read_only_sources() {
        let chain = CredentialChain::new(vec![
            Arc::new(MapSource::new("env", &[], false)),
            Arc::new(MapSource::new("keychain", &[], true)),
        ]);
        chain.store("KEY", "sk-test").await.unwrap();
        assert_eq!(chain.resolve("KEY").await.unwrap().as_deref(), Some("sk-test"));
    }

    #[tokio::test]
    async fn remove_missing_is_not_found() {
        let chain = CredentialChain::new(vec![Arc::new(MapSource::new("keychain", &[], true))]);
        assert!(matches!(
            chain.remove("KEY").await,
            Err(RepositoryError::NotFound)
        ));
    }
}
