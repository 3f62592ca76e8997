//! Global configuration types for wachat.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! completion provider, the assistant's system instruction, session lifetime,
//! and the context window policy.

use serde::{Deserialize, Serialize};

/// System instruction prepended to every completion request.
///
/// Asks the assistant to answer in French, clearly and concisely.
pub const DEFAULT_SYSTEM_PROMPT: &str = "Tu es un assistant IA français serviable et amical. \
Tu réponds toujours en français de manière claire et concise.";

/// Top-level configuration.
///
/// Loaded from `~/.wachat/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub assistant: AssistantSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub context: ContextSettings,
}

/// Which OpenAI-compatible endpoint to talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Preset name ("openai", "mistral", "gemini"); unknown names use OpenAI.
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// Overrides the preset's base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the credential holding the API key (env var / keychain entry).
    #[serde(default = "default_api_key_name")]
    pub api_key_name: String,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_key_name() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: None,
            model: default_model(),
            api_key_name: default_api_key_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantSettings {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Lifetime of a sign-in before it expires.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u32,
}

fn default_ttl_hours() -> u32 {
    24
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
        }
    }
}

/// Context window policy. With no `max_turns`, the full history is sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextSettings {
    #[serde(default)]
    pub max_turns: Option<usize>,
}
