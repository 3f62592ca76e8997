//! wachat CLI entry point.
//!
//! Binary name: `wachat`
//!
//! Parses CLI arguments, initializes the database and services, then
//! dispatches to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use wachat_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands, KeyCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "wachat", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;

    match cli.command {
        Commands::Signup { email } => {
            cli::account::sign_up(&state, email, cli.json).await?;
        }
        Commands::Login { email } => {
            cli::account::sign_in(&state, email, cli.json).await?;
        }
        Commands::Logout => {
            cli::account::sign_out(&state, cli.json).await?;
        }
        Commands::Whoami => {
            cli::account::whoami(&state, cli.json)?;
        }
        Commands::Refresh => {
            cli::account::refresh(&state, cli.json).await?;
        }
        Commands::Chat => {
            cli::chat::loop_runner::run_chat_loop(&state).await?;
        }
        Commands::History { limit } => {
            cli::history::show_history(&state, limit, cli.json).await?;
        }
        Commands::Key { action } => match action {
            KeyCommand::Set { value } => {
                cli::key::set_key(&state, value.as_deref(), cli.json).await?;
            }
            KeyCommand::Clear => {
                cli::key::clear_key(&state, cli.json).await?;
            }
            KeyCommand::Status => {
                cli::key::key_status(&state, cli.json).await?;
            }
        },
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
