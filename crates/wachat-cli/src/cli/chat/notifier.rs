//! Prints orchestrator notifications in colour.

use std::io::Write;
use std::sync::Mutex;

use console::style;

use wachat_core::chat::{Notification, NotificationLevel, Notifier};

/// Writes to any `Write` sink; in the chat loop that is the readline
/// `SharedWriter` so output does not clobber the prompt.
pub struct TerminalNotifier<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

pub fn format_notification(notification: &Notification) -> String {
    let marker = match notification.level {
        NotificationLevel::Info => style("i").blue().bold(),
        NotificationLevel::Warning => style("!").yellow().bold(),
        NotificationLevel::Error => style("✗").red().bold(),
    };
    let message = match notification.level {
        NotificationLevel::Error => style(notification.message.as_str()).red(),
        _ => style(notification.message.as_str()),
    };
    format!("\n  {marker} {message}\n")
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(&self, notification: Notification) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = write!(out, "{}", format_notification(&notification)) {
            tracing::debug!(error = %e, "could not print notification");
        }
        let _ = out.flush();
    }
}
