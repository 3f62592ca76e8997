//! Interactive chat in the terminal.
//!
//! Entry point: `loop_runner::run_chat_loop`. The loop drives a
//! `ConversationOrchestrator` and only renders what it holds.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod notifier;
pub mod renderer;
