//! Decorator that prepends the assistant's system instruction.
//!
//! The orchestrator only ever builds user/assistant turns. The system turn is
//! added here, at the provider boundary, so it never reaches the transcript
//! or the message store.

use wachat_types::llm::{
    CompletionError, CompletionReply, CompletionRequest, CompletionRole, CompletionTurn,
};

use super::provider::CompletionProvider;

pub struct SystemPromptProvider<P> {
    inner: P,
    instruction: String,
}

impl<P: CompletionProvider> SystemPromptProvider<P> {
    pub fn new(inner: P, instruction: impl Into<String>) -> Self {
        Self {
            inner,
            instruction: instruction.into(),
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Exactly one system turn, always first. Any system turns already in the
    /// request are dropped.
    fn with_instruction(&self, request: &CompletionRequest) -> CompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(CompletionTurn::system(self.instruction.clone()));
        messages.extend(
            request
                .messages
                .iter()
                .filter(|turn| turn.role != CompletionRole::System)
                .cloned(),
        );
        CompletionRequest {
            model: request.model.clone(),
            messages,
        }
    }
}

impl<P: CompletionProvider> CompletionProvider for SystemPromptProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, CompletionError> {
        let request = self.with_instruction(request);
        self.inner.complete(&request).await
    }
}
