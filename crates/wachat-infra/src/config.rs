//! Global configuration loader for wachat.
//!
//! Reads `config.toml` from the data directory (`~/.wachat/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use wachat_types::config::GlobalConfig;

pub const CONFIG_FILE: &str = "config.toml";

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`GlobalConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Session lifetime from config, never shorter than one hour.
pub fn session_ttl(config: &GlobalConfig) -> chrono::Duration {
    chrono::Duration::hours(i64::from(config.session.ttl_hours.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wachat_types::config::DEFAULT_SYSTEM_PROMPT;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.provider.model, "gpt-3.5-turbo");
        assert_eq!(config.assistant.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[provider]
name = "gemini"
model = "gemini-2.0-flash"
api_key_name = "GEMINI_API_KEY"

[assistant]
system_prompt = "Answer in English."

[session]
ttl_hours = 8
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.provider.name, "gemini");
        assert_eq!(config.provider.api_key_name, "GEMINI_API_KEY");
        assert_eq!(config.assistant.system_prompt, "Answer in English.");
        assert_eq!(session_ttl(&config), chrono::Duration::hours(8));
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join(CONFIG_FILE), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.provider.name, "openai");
        assert_eq!(config.session.ttl_hours, 24);
    }

    #[test]
    fn session_ttl_has_floor() {
        let mut config = GlobalConfig::default();
        config.session.ttl_hours = 0;
        assert_eq!(session_ttl(&config), chrono::Duration::hours(1));
    }
}
