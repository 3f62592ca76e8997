//! CLI command definitions for the `wachat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod account;
pub mod chat;
pub mod history;
pub mod key;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Discutez avec WA Assistant IA depuis votre terminal.
#[derive(Parser)]
#[command(name = "wachat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Sortie JSON au lieu du texte mis en forme.
    #[arg(long, global = true)]
    pub json: bool,

    /// N'afficher que les erreurs.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Sortie détaillée (-v pour verbeux, -vv pour trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Exporter aussi les spans via OpenTelemetry (sortie standard).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Créer un compte (sans se connecter).
    Signup {
        /// Adresse e-mail (demandée si absente).
        #[arg(long)]
        email: Option<String>,
    },

    /// Se connecter avec e-mail et mot de passe.
    #[command(alias = "signin")]
    Login {
        /// Adresse e-mail (demandée si absente).
        #[arg(long)]
        email: Option<String>,
    },

    /// Se déconnecter et oublier la session enregistrée.
    #[command(alias = "signout")]
    Logout,

    /// Afficher le compte connecté.
    Whoami,

    /// Prolonger la session en cours.
    Refresh,

    /// Démarrer la conversation interactive.
    Chat,

    /// Afficher la conversation enregistrée.
    History {
        /// N'afficher que les N derniers messages.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Gérer la clé API dans le trousseau du système.
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// Générer les complétions du shell.
    Completions {
        /// Shell ciblé.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Enregistrer la clé API (saisie masquée si --value est absent).
    Set {
        #[arg(long)]
        value: Option<String>,
    },

    /// Supprimer la clé API enregistrée.
    Clear,

    /// Indiquer si une clé API est disponible.
    Status,
}
