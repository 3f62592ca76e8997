//! Terminal rendering of transcript messages.
//!
//! Message bodies are markdown rendered through `termimad`; each message is
//! preceded by a role label and its time.

use console::style;
use termimad::MadSkin;
use termimad::crossterm::style::Color;

use wachat_types::message::{Message, MessageRole};

pub struct ChatRenderer {
    skin: MadSkin,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    pub fn role_label(role: MessageRole) -> String {
        match role {
            MessageRole::User => style("Vous").green().bold().to_string(),
            MessageRole::Assistant => style("Assistant").cyan().bold().to_string(),
        }
    }

    pub fn render_message(&self, message: &Message) -> String {
        let body = match message.role {
            MessageRole::Assistant => self.skin.term_text(&message.content).to_string(),
            MessageRole::User => format!("{}\n", message.content),
        };

        let mut out = format!(
            "\n  {} {}\n",
            Self::role_label(message.role),
            style(message.created_at.format("%H:%M")).dim()
        );
        for line in body.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn render_transcript(&self, messages: &[Message]) -> String {
        messages.iter().map(|m| self.render_message(m)).collect()
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}
