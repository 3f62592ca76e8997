//! API key management: set, clear, status.
//!
//! The key name comes from `config.toml` (`provider.api_key_name`). Writes go
//! to the first writable credential source, which is the OS keychain.

use anyhow::Result;
use console::style;
use dialoguer::Password;

use wachat_types::error::RepositoryError;

use crate::state::AppState;

/// Show only the first and last few characters.
pub fn mask_key(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub async fn set_key(state: &AppState, value: Option<&str>, json: bool) -> Result<()> {
    let key_name = &state.config.provider.api_key_name;
    let secret_value = match value {
        Some(v) => v.trim().to_string(),
        None => Password::new()
            .with_prompt(format!("Valeur de {}", style(key_name).bold()))
            .interact()?
            .trim()
            .to_string(),
    };
    if secret_value.is_empty() {
        anyhow::bail!("la clé API ne peut pas être vide");
    }

    state.credentials.store(key_name, &secret_value).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"set": true, "key": key_name, "masked": mask_key(&secret_value)})
        );
    } else {
        println!(
            "  {} '{}' enregistrée dans le trousseau du système ({})",
            style("✓").green().bold(),
            style(key_name).bold(),
            mask_key(&secret_value)
        );
    }
    Ok(())
}

pub async fn clear_key(state: &AppState, json: bool) -> Result<()> {
    let key_name = &state.config.provider.api_key_name;
    let removed = match state.credentials.remove(key_name).await {
        Ok(()) => true,
        Err(RepositoryError::NotFound) => false,
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::json!({"cleared": removed, "key": key_name}));
    } else if removed {
        println!("  {} '{}' supprimée", style("✓").green().bold(), style(key_name).bold());
    } else {
        println!("  {} Aucune valeur enregistrée pour '{}'", style("i").blue().bold(), key_name);
    }
    Ok(())
}

pub async fn key_status(state: &AppState, json: bool) -> Result<()> {
    let key_name = &state.config.provider.api_key_name;
    let found = state.credentials.resolve(key_name).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "key": key_name,
                "configured": found.is_some(),
                "masked": found.as_deref().map(mask_key),
            })
        );
        return Ok(());
    }

    match found {
        Some(value) => println!(
            "  {} {} est configurée ({})",
            style("✓").green().bold(),
            style(key_name).bold(),
            mask_key(&value)
        ),
        None => println!(
            "  {} {} n'est pas définie. Exportez-la ou lancez : {}",
            style("!").yellow().bold(),
            style(key_name).bold(),
            style("wachat key set").yellow()
        ),
    }
    Ok(())
}
