//! CompletionProvider trait definition.

use wachat_types::llm::{CompletionError, CompletionReply, CompletionRequest};

/// Trait for completion backends (OpenAI-compatible endpoints, test fakes).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in wachat-infra (e.g., `OpenAiCompatibleProvider`).
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "mistral").
    fn name(&self) -> &str;

    /// Send the ordered turns and receive the next assistant turn.
    ///
    /// Never retried. Failures map to exactly one `CompletionError` variant.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionReply, CompletionError>> + Send;
}
