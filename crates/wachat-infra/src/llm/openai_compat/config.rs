//! Presets for OpenAI-compatible endpoints.
//!
//! Each provider that speaks the OpenAI chat completions protocol gets a
//! preset with its base URL. The API key is optional: a provider built
//! without one reports `MissingCredential` on use.

use secrecy::SecretString;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Configuration for an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai", "mistral").
    pub provider_name: String,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    /// Used when a request leaves `model` empty.
    pub model: String,
}

impl OpenAiCompatConfig {
    /// Preset for a well-known provider name. Unknown names get the OpenAI
    /// base URL but keep their own name.
    pub fn preset(provider_name: &str, api_key: Option<SecretString>, model: &str) -> Self {
        let base_url = match provider_name {
            "mistral" => MISTRAL_BASE_URL,
            "gemini" => GEMINI_BASE_URL,
            _ => OPENAI_BASE_URL,
        };
        Self {
            provider_name: provider_name.to_string(),
            base_url: base_url.to_string(),
            api_key,
            model: model.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
