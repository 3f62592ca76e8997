//! Context window policies.
//!
//! A policy decides which turns of the payload reach the completion provider.
//! It runs after the new user turn has been appended to the payload and
//! before the provider adds its system instruction.

use wachat_types::config::ContextSettings;
use wachat_types::llm::CompletionTurn;

pub trait ContextWindowPolicy: Send + Sync {
    fn name(&self) -> &str;

    /// Must keep the last turn (the new user message).
    fn apply(&self, turns: Vec<CompletionTurn>) -> Vec<CompletionTurn>;
}

/// Sends the entire history on every turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullHistory;

impl ContextWindowPolicy for FullHistory {
    fn name(&self) -> &str {
        "full_history"
    }

    fn apply(&self, turns: Vec<CompletionTurn>) -> Vec<CompletionTurn> {
        turns
    }
}

/// Keeps only the most recent `max_turns` turns.
#[derive(Debug, Clone, Copy)]
pub struct RecentTurns {
    max_turns: usize,
}

impl RecentTurns {
    /// A window of zero would drop the new user message; it is raised to one.
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns: max_turns.max(1),
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }
}

impl ContextWindowPolicy for RecentTurns {
    fn name(&self) -> &str {
        "recent_turns"
    }

    fn apply(&self, mut turns: Vec<CompletionTurn>) -> Vec<CompletionTurn> {
        if turns.len() > self.max_turns {
            turns.drain(..turns.len() - self.max_turns);
        }
        turns
    }
}

/// `FullHistory` unless `max_turns` is configured.
pub fn policy_from_settings(settings: &ContextSettings) -> Box<dyn ContextWindowPolicy> {
    match settings.max_turns {
        Some(max_turns) => Box::new(RecentTurns::new(max_turns)),
        None => Box::new(FullHistory),
    }
}
