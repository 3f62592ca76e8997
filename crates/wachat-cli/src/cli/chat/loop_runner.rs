//! Main chat loop.
//!
//! Builds a `ConversationOrchestrator` subscribed to the session store,
//! shows the banner or the saved conversation, then reads lines until the
//! user leaves. Every turn goes through `send_turn`; this module only renders
//! what the transcript holds afterwards.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use wachat_core::auth::SessionStore;
use wachat_core::chat::{
    ConversationOrchestrator, Notification, Notifier, SessionChange, policy_from_settings,
    validate_input,
};
use wachat_types::message::MessageRole;

use crate::state::AppState;

use super::banner::welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::notifier::TerminalNotifier;
use super::renderer::ChatRenderer;

/// Show a spinner for as long as the busy flag is set.
fn spawn_busy_spinner(mut busy: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut spinner: Option<ProgressBar> = None;
        while busy.changed().await.is_ok() {
            let is_busy = *busy.borrow_and_update();
            match (is_busy, spinner.take()) {
                (true, None) => spinner = Some(thinking_spinner()),
                (true, Some(active)) => spinner = Some(active),
                (false, Some(active)) => active.finish_and_clear(),
                (false, None) => {}
            }
        }
        if let Some(active) = spinner {
            active.finish_and_clear();
        }
    })
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message("réflexion...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let Some(session) = state.auth.current() else {
        bail!("vous n'êtes pas connecté. Connectez-vous avec : wachat login");
    };

    let prompt = format!("  {} ", style("Vous >").green().bold());
    let (mut chat_input, mut out) =
        ChatInput::new(prompt).context("failed to initialize input")?;

    let notifier = Arc::new(TerminalNotifier::new(out.clone()));
    let provider = state.completion_provider().await;
    let model = state.config.provider.model.clone();
    let mut orchestrator = ConversationOrchestrator::new(
        state.message_repository(),
        provider,
        Arc::clone(&notifier),
        state.auth.subscribe(),
    )
    .with_policy(policy_from_settings(&state.config.context))
    .with_model(model.clone());

    orchestrator.sync_session().await;
    info!(user_id = %session.user_id, messages = orchestrator.transcript().len(), "chat started");

    let renderer = ChatRenderer::new();
    if orchestrator.transcript().is_empty() {
        write!(out, "{}", welcome_banner(&session.email, &model))?;
    } else {
        write!(out, "{}", renderer.render_transcript(orchestrator.transcript()))?;
        writeln!(out, "  {}", style("Tapez /help pour les commandes, Ctrl+D pour quitter").dim())?;
    }

    let spinner_task = spawn_busy_spinner(orchestrator.busy());

    loop {
        let line = match chat_input.read_line().await {
            InputEvent::Eof => {
                writeln!(out, "\n  {}", style("Session terminée.").dim())?;
                break;
            }
            InputEvent::Interrupted => {
                writeln!(out, "\n  {}", style("Ctrl+D pour quitter, ou continuez la conversation.").dim())?;
                continue;
            }
            InputEvent::Line(line) => line,
        };

        if let Some(cmd) = commands::parse(&line) {
            match cmd {
                ChatCommand::Help => write!(out, "{}", commands::help_text())?,
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::History => {
                    if orchestrator.transcript().is_empty() {
                        writeln!(out, "\n  {}", style("Aucun message pour le moment.").dim())?;
                    } else {
                        write!(out, "{}", renderer.render_transcript(orchestrator.transcript()))?;
                    }
                }
                ChatCommand::New => {
                    writeln!(
                        out,
                        "\n  {} Démarrer une nouvelle conversation n'est pas encore disponible.",
                        style("!").yellow().bold()
                    )?;
                }
                ChatCommand::Logout => {
                    if let Err(e) = state.auth.sign_out().await {
                        notifier.notify(Notification::error(format!("Impossible de se déconnecter : {e}")));
                        continue;
                    }
                    let change = orchestrator.sync_session().await;
                    debug!(?change, "signed out from chat");
                    writeln!(out, "\n  {} Déconnecté", style("✓").green().bold())?;
                    break;
                }
                ChatCommand::Exit => {
                    writeln!(out, "\n  {}", style("Session terminée.").dim())?;
                    break;
                }
                ChatCommand::Unknown(name) => {
                    writeln!(
                        out,
                        "\n  {} Commande inconnue : {}. Tapez /help pour la liste des commandes.",
                        style("?").yellow().bold(),
                        style(name).dim()
                    )?;
                }
            }
            continue;
        }

        // Blank input never reaches the orchestrator.
        let Ok(text) = validate_input(&line) else {
            continue;
        };

        if orchestrator.sync_session().await == SessionChange::SignedOut {
            writeln!(
                out,
                "\n  {} Votre session a expiré. Reconnectez-vous avec : {}",
                style("!").yellow().bold(),
                style("wachat login").yellow()
            )?;
            break;
        }
        let current = orchestrator.session();

        let before = orchestrator.transcript().len();
        let outcome = orchestrator.send_turn(text, current.as_ref()).await;
        debug!(?outcome, "turn finished");

        for message in &orchestrator.transcript()[before..] {
            if message.role == MessageRole::Assistant {
                write!(out, "{}", renderer.render_message(message))?;
            }
        }
    }

    spinner_task.abort();
    Ok(())
}
