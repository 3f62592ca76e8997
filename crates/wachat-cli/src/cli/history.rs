//! `wachat history`: print the signed-in user's saved conversation.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use wachat_core::auth::SessionStore;
use wachat_core::repository::message::MessageRepository;
use wachat_types::message::{Message, MessageRole};

use crate::state::AppState;

const PREVIEW_CHARS: usize = 100;

pub async fn show_history(state: &AppState, limit: Option<usize>, json: bool) -> Result<()> {
    let Some(session) = state.auth.current() else {
        bail!("vous n'êtes pas connecté. Connectez-vous avec : wachat login");
    };

    let rows = state
        .message_repository()
        .select_all(&session.user_id)
        .await?;
    let mut messages: Vec<Message> = rows.into_iter().map(Message::from).collect();
    if let Some(limit) = limit {
        let skip = messages.len().saturating_sub(limit);
        messages = messages.split_off(skip);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} Aucun message pour le moment. Commencez avec : {}",
            style("i").blue().bold(),
            style("wachat chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Heure").fg(Color::White),
        Cell::new("Rôle").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for message in &messages {
        let role = match message.role {
            MessageRole::User => Cell::new("Vous").fg(Color::Green),
            MessageRole::Assistant => Cell::new("Assistant").fg(Color::Cyan),
        };
        table.add_row(vec![
            Cell::new(message.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
            role,
            Cell::new(preview(&message.content, PREVIEW_CHARS)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} message{}",
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}

/// Single-line preview, cut on a char boundary.
pub fn preview(content: &str, max_chars: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
