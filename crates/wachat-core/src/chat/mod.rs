//! Conversation orchestration for wachat.
//!
//! `ConversationOrchestrator` owns the in-memory transcript for the active
//! session and sequences each turn: persist user message, complete, persist
//! assistant message. Everything it talks to is injected.

pub mod context_window;
pub mod input;
pub mod notifier;
pub mod orchestrator;
pub mod transcript;

pub use context_window::{ContextWindowPolicy, FullHistory, RecentTurns, policy_from_settings};
pub use input::validate_input;
pub use notifier::{Notification, NotificationLevel, Notifier};
pub use orchestrator::{ConversationOrchestrator, SessionChange, TurnOutcome};
pub use transcript::Transcript;
