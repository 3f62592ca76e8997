//! BoxCompletionProvider -- object-safe dynamic dispatch wrapper for CompletionProvider.
//!
//! 1. `CompletionProviderDyn` is the object-safe twin with boxed futures
//! 2. Blanket-impl `CompletionProviderDyn` for all `T: CompletionProvider`
//! 3. `BoxCompletionProvider` wraps `Box<dyn CompletionProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use wachat_types::llm::{CompletionError, CompletionReply, CompletionRequest};

use super::provider::CompletionProvider;

/// Object-safe version of [`CompletionProvider`] with boxed futures.
pub trait CompletionProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionReply, CompletionError>> + Send + 'a>>;
}

impl<T: CompletionProvider> CompletionProviderDyn for T {
    fn name(&self) -> &str {
        CompletionProvider::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionReply, CompletionError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// Type-erased completion provider, selected at runtime from config.
///
/// Itself implements [`CompletionProvider`], so it can be handed to anything
/// generic over the trait.
pub struct BoxCompletionProvider {
    inner: Box<dyn CompletionProviderDyn>,
}

impl BoxCompletionProvider {
    pub fn new<T: CompletionProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }
}

impl CompletionProvider for BoxCompletionProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, CompletionError> {
        self.inner.complete_boxed(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::{BoxCompletionProvider, CompletionError, CompletionProvider, CompletionReply, CompletionRequest};

    struct Echo;

    impl CompletionProvider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionReply, CompletionError> {
            let last = request
                .messages
                .last()
                .map(|t| t.content.clone())
                .unwrap_or_default();
            Ok(CompletionReply {
                content: last,
                model: "echo-1".to_string(),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn boxed_provider_delegates() {
        let boxed = BoxCompletionProvider::new(Echo);
        assert_eq!(boxed.name(), "echo");
        let reply = boxed
            .complete(&CompletionRequest {
                model: String::new(),
                messages: vec![wachat_types::llm::CompletionTurn::user("Salut")],
            })
            .await
            .unwrap();
        assert_eq!(reply.content, "Salut");
    }
}
