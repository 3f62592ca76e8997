//! Completion provider construction.
//!
//! [`create_provider`] builds the configured OpenAI-compatible provider and
//! wraps it so every request carries the assistant's system instruction.

pub mod openai_compat;

use secrecy::SecretString;

use wachat_core::llm::box_provider::BoxCompletionProvider;
use wachat_core::llm::system_prompt::SystemPromptProvider;
use wachat_core::repository::credential::CredentialChain;
use wachat_types::config::GlobalConfig;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::OpenAiCompatConfig;

/// Build the provider described by `config`.
///
/// A missing `api_key` is not an error here; the provider reports
/// `MissingCredential` when it is first used.
pub fn create_provider(config: &GlobalConfig, api_key: Option<SecretString>) -> BoxCompletionProvider {
    let settings = &config.provider;
    let mut oai_config = OpenAiCompatConfig::preset(&settings.name, api_key, &settings.model);
    if let Some(base_url) = settings.base_url.as_deref() {
        oai_config = oai_config.with_base_url(base_url);
    }

    let provider = OpenAiCompatibleProvider::new(oai_config);
    BoxCompletionProvider::new(SystemPromptProvider::new(
        provider,
        config.assistant.system_prompt.clone(),
    ))
}

/// Look up the configured API key through the credential chain.
///
/// Lookup failures (e.g., a locked keychain) are logged and treated as absent.
pub async fn resolve_api_key(config: &GlobalConfig, chain: &CredentialChain) -> Option<SecretString> {
    let key_name = &config.provider.api_key_name;
    match chain.resolve(key_name).await {
        Ok(Some(value)) => Some(SecretString::from(value)),
        Ok(None) => {
            tracing::debug!(key = %key_name, "no API key found");
            None
        }
        Err(e) => {
            tracing::warn!(key = %key_name, error = %e, "API key lookup failed");
            None
        }
    }
}
