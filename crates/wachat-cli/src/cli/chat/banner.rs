//! Welcome banner shown when the transcript is empty.

use console::style;

pub const WELCOME_TITLE: &str = "Bienvenue sur WA Assistant IA";

pub fn welcome_banner(email: &str, model: &str) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("  {}\n", style(WELCOME_TITLE).cyan().bold()));
    out.push_str(&format!(
        "  {}\n",
        style("Posez une question pour commencer la conversation.").dim()
    ));
    out.push('\n');
    out.push_str(&format!("  {}  {}\n", style("Compte :").bold(), style(email).dim()));
    out.push_str(&format!("  {}  {}\n", style("Modèle :").bold(), style(model).dim()));
    out.push('\n');
    out.push_str(&format!(
        "  {}\n",
        style("Tapez /help pour les commandes, Ctrl+D pour quitter").dim()
    ));
    out.push_str(&format!("  {}\n", style("---").dim()));
    out
}
