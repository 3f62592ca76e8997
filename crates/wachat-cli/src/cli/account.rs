//! Account CLI commands: signup, login, logout, whoami, refresh.

use anyhow::Result;
use console::style;
use dialoguer::{Input, Password};

use wachat_core::auth::SessionStore;
use wachat_types::session::Session;

use crate::state::AppState;

fn prompt_email(email: Option<String>) -> Result<String> {
    match email {
        Some(email) => Ok(email),
        None => Ok(Input::<String>::new().with_prompt("E-mail").interact_text()?),
    }
}

fn session_json(session: &Session) -> serde_json::Value {
    serde_json::json!({
        "user_id": session.user_id.as_str(),
        "email": session.email,
        "expires_at": session.expires_at.to_rfc3339(),
    })
}

pub async fn sign_up(state: &AppState, email: Option<String>, json: bool) -> Result<()> {
    let email = prompt_email(email)?;
    let password = Password::new()
        .with_prompt("Mot de passe")
        .with_confirmation("Confirmez le mot de passe", "Les mots de passe ne correspondent pas")
        .interact()?;

    let account = state.auth.sign_up(&email, &password).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"created": true, "user_id": account.id.as_str(), "email": account.email})
        );
    } else {
        println!();
        println!(
            "  {} Compte créé pour {}",
            style("✓").green().bold(),
            style(&account.email).cyan()
        );
        println!(
            "  {}",
            style("Connectez-vous avec : wachat login").dim()
        );
        println!();
    }
    Ok(())
}

pub async fn sign_in(state: &AppState, email: Option<String>, json: bool) -> Result<()> {
    let email = prompt_email(email)?;
    let password = Password::new().with_prompt("Mot de passe").interact()?;

    let session = state.auth.sign_in(&email, &password).await?;

    if json {
        println!("{}", session_json(&session));
    } else {
        println!();
        println!(
            "  {} Connecté en tant que {}",
            style("✓").green().bold(),
            style(&session.email).cyan()
        );
        println!(
            "  {} {}",
            style("Session valide jusqu'au").dim(),
            style(session.expires_at.format("%Y-%m-%d %H:%M UTC")).dim()
        );
        println!();
    }
    Ok(())
}

pub async fn sign_out(state: &AppState, json: bool) -> Result<()> {
    let was_signed_in = state.auth.current().is_some();
    state.auth.sign_out().await?;

    if json {
        println!("{}", serde_json::json!({"signed_out": was_signed_in}));
    } else if was_signed_in {
        println!("  {} Déconnecté", style("✓").green().bold());
    } else {
        println!("  {} Vous n'êtes pas connecté", style("i").blue().bold());
    }
    Ok(())
}

pub fn whoami(state: &AppState, json: bool) -> Result<()> {
    let session = state.auth.current();

    if json {
        let value = session
            .as_ref()
            .map(session_json)
            .unwrap_or(serde_json::Value::Null);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match session {
        Some(session) => {
            println!();
            println!("  {}  {}", style("E-mail :").bold(), style(&session.email).cyan());
            println!("  {}  {}", style("Compte :").bold(), style(session.user_id.as_str()).dim());
            println!(
                "  {}  {}",
                style("Expire :").bold(),
                style(session.expires_at.format("%Y-%m-%d %H:%M UTC")).dim()
            );
            println!();
        }
        None => {
            println!(
                "  {} Vous n'êtes pas connecté. Connectez-vous avec : {}",
                style("i").blue().bold(),
                style("wachat login").yellow()
            );
        }
    }
    Ok(())
}

pub async fn refresh(state: &AppState, json: bool) -> Result<()> {
    let session = state.auth.refresh().await?;

    if json {
        println!("{}", session_json(&session));
    } else {
        println!(
            "  {} Session prolongée jusqu'au {}",
            style("✓").green().bold(),
            style(session.expires_at.format("%Y-%m-%d %H:%M UTC")).dim()
        );
    }
    Ok(())
}
