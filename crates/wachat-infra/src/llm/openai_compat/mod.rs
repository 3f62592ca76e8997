//! OpenAI-compatible completion provider.
//!
//! A single [`OpenAiCompatibleProvider`] serves OpenAI, Mistral and Gemini
//! (through its OpenAI-compatible endpoint) via configurable base URLs.
//! Requests go out over `reqwest`, one attempt each; [`async_openai`] only
//! supplies the request/response types.

pub mod config;

use std::time::Duration;

use async_openai::error::WrappedError;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
    CreateChatCompletionResponse,
};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::{Instrument, field, info_span};

use wachat_core::llm::provider::CompletionProvider;
use wachat_observe::genai_attrs;
use wachat_types::llm::{
    CompletionError, CompletionReply, CompletionRequest, CompletionRole, CompletionTurn, Usage,
};

use self::config::OpenAiCompatConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Provider for any OpenAI-compatible chat completions API.
///
/// Does NOT derive Debug: it holds the API key.
pub struct OpenAiCompatibleProvider {
    http: reqwest::Client,
    /// `None` when no API key was resolved.
    api_key: Option<SecretString>,
    provider_name: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to a default HTTP client");
                reqwest::Client::new()
            });

        Self {
            http,
            api_key: config.api_key,
            provider_name: config.provider_name,
            base_url: config.base_url,
            model: config.model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Build a [`CreateChatCompletionRequest`] from a [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages = request.messages.iter().map(to_openai_message).collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            ..Default::default()
        }
    }

    async fn send(
        &self,
        api_key: &SecretString,
        body: &CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse, CompletionError> {
        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "completion request failed");
                CompletionError::Unknown(format!("HTTP request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &error_body));
        }

        response.json().await.map_err(|e| {
            tracing::error!(error = %e, "unreadable completion response");
            CompletionError::Unknown(format!("failed to parse response: {e}"))
        })
    }
}

fn to_openai_message(turn: &CompletionTurn) -> ChatCompletionRequestMessage {
    match turn.role {
        CompletionRole::System => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(turn.content.clone()),
                name: None,
            })
        }
        CompletionRole::User => {
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(turn.content.clone()),
                name: None,
            })
        }
        CompletionRole::Assistant => {
            #[allow(deprecated)]
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    turn.content.clone(),
                )),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

impl CompletionProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionReply, CompletionError> {
        let Some(api_key) = self.api_key.as_ref() else {
            tracing::warn!(provider = %self.provider_name, "no API key configured");
            return Err(CompletionError::MissingCredential);
        };

        let oai_request = self.build_request(request);
        let span = info_span!(
            "gen_ai.chat",
            gen_ai.operation.name = genai_attrs::OP_CHAT,
            gen_ai.provider.name = %self.provider_name,
            gen_ai.request.model = %oai_request.model,
            gen_ai.request.messages = oai_request.messages.len(),
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
            gen_ai.response.id = field::Empty,
        );

        let response = self
            .send(api_key, &oai_request)
            .instrument(span.clone())
            .await?;

        span.record(genai_attrs::GEN_AI_RESPONSE_ID, response.id.as_str());
        let usage = response.usage.map(|u| {
            span.record(genai_attrs::GEN_AI_USAGE_INPUT_TOKENS, u.prompt_tokens);
            span.record(genai_attrs::GEN_AI_USAGE_OUTPUT_TOKENS, u.completion_tokens);
            Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }
        });

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| CompletionError::Unknown("provider returned no content".to_string()))?;

        Ok(CompletionReply {
            content,
            model: response.model,
            usage,
        })
    }
}

/// Map a non-success HTTP response to a [`CompletionError`].
///
/// Status 429 is rate limiting whatever the body says. Other statuses count
/// as rate limiting only when the body carries a quota error code.
/// Everything else, authentication failures included, is `Unknown`.
fn classify_failure(status: StatusCode, body: &str) -> CompletionError {
    let api_error = serde_json::from_str::<WrappedError>(body).ok().map(|w| w.error);

    let quota_error = api_error.as_ref().is_some_and(|e| {
        let code = e.code.as_deref().unwrap_or("");
        let error_type = e.r#type.as_deref().unwrap_or("");
        matches!(code, "rate_limit_exceeded" | "insufficient_quota")
            || matches!(error_type, "rate_limit_error" | "insufficient_quota" | "requests" | "tokens")
    });

    if status == StatusCode::TOO_MANY_REQUESTS || quota_error {
        tracing::warn!(%status, "completion rate limited");
        return CompletionError::RateLimited;
    }

    let detail = match api_error {
        Some(e) => format!("HTTP {status}: {}", e.message),
        None => format!("HTTP {status}: {body}"),
    };
    tracing::error!(%status, detail = %detail, "completion request failed");
    CompletionError::Unknown(detail)
}
