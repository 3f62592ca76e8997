//! Completion provider abstractions for wachat.
//!
//! - `CompletionProvider`: RPITIT trait for concrete provider implementations
//! - `BoxCompletionProvider`: object-safe wrapper for runtime provider selection
//! - `SystemPromptProvider`: decorator that prepends the assistant instruction

pub mod box_provider;
pub mod provider;
pub mod system_prompt;
