//! Slash commands available inside the chat loop.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// Clear the terminal screen (the transcript is kept).
    Clear,
    /// Re-print the whole transcript.
    History,
    /// Start a new conversation. Not supported: there is a single thread.
    New,
    /// Sign out and leave the chat.
    Logout,
    Exit,
    Unknown(String),
}

/// `None` if the input is not a slash command.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    let parsed = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/history" => ChatCommand::History,
        "/new" => ChatCommand::New,
        "/logout" | "/signout" => ChatCommand::Logout,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(parsed)
}

pub fn help_text() -> String {
    let rows = [
        ("/help", "Afficher cette aide"),
        ("/clear", "Effacer l'écran"),
        ("/history", "Afficher la conversation"),
        ("/new", "Nouvelle conversation"),
        ("/logout", "Se déconnecter et quitter"),
        ("/exit", "Quitter la conversation"),
    ];

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("  {}\n\n", style("Commandes disponibles :").bold()));
    for (name, description) in rows {
        out.push_str(&format!("  {}  {description}\n", style(format!("{name:<9}")).cyan()));
    }
    out.push('\n');
    out.push_str(&format!("  {}\n", style("Ctrl+D pour quitter").dim()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(parse("Bonjour"), None);
        assert_eq!(parse("  une question / deux"), None);
    }

    #[test]
    fn test_parse_known_commands_and_aliases() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("/cls"), Some(ChatCommand::Clear));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
        assert_eq!(parse("/new"), Some(ChatCommand::New));
        assert_eq!(parse("/logout"), Some(ChatCommand::Logout));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        assert_eq!(parse("  /EXIT  "), Some(ChatCommand::Exit));
        assert_eq!(parse("/History please"), Some(ChatCommand::History));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/remember x"), Some(ChatCommand::Unknown("/remember".to_string())));
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for name in ["/help", "/clear", "/history", "/new", "/logout", "/exit"] {
            assert!(help.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_help_is_in_french() {
        let help = help_text();
        assert!(help.contains("Commandes disponibles"));
        assert!(help.contains("Se déconnecter et quitter"));
    }
}
