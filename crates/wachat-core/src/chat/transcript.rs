//! The ordered in-memory message list for the active session.

use wachat_types::llm::CompletionTurn;
use wachat_types::message::Message;

/// Replaced wholesale on load, appended on turns, never persisted as a whole.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Each message reduced to `{role, content}`.
    pub fn to_turns(&self) -> Vec<CompletionTurn> {
        self.messages
            .iter()
            .map(|m| CompletionTurn::new(m.role, m.content.clone()))
            .collect()
    }
}
