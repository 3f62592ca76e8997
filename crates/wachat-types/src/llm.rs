//! Completion request/response types for wachat.
//!
//! These types model the data shapes for the completion provider boundary:
//! role-tagged turns, the request envelope, the reply, and the error
//! taxonomy surfaced to the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::message::MessageRole;

/// Role of a turn in a completion request.
///
/// Unlike [`MessageRole`], this includes `System`: the system instruction
/// exists only inside requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for CompletionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionRole::System => write!(f, "system"),
            CompletionRole::User => write!(f, "user"),
            CompletionRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for CompletionRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(CompletionRole::System),
            "user" => Ok(CompletionRole::User),
            "assistant" => Ok(CompletionRole::Assistant),
            other => Err(format!("invalid completion role: '{other}'")),
        }
    }
}

impl From<MessageRole> for CompletionRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => CompletionRole::User,
            MessageRole::Assistant => CompletionRole::Assistant,
        }
    }
}

/// A single `{role, content}` turn sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTurn {
    pub role: CompletionRole,
    pub content: String,
}

impl CompletionTurn {
    pub fn new(role: impl Into<CompletionRole>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(CompletionRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(CompletionRole::User, content)
    }
}

/// Request to a completion provider.
///
/// An empty `model` means "use the provider's configured model".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionTurn>,
}

/// The assistant turn returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReply {
    pub content: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage reported by the provider, when available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors surfaced by the completion provider boundary.
///
/// The `Display` text of each variant is the human-readable notification
/// shown to the user. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error(
        "Le service est temporairement indisponible en raison de limitations de l'API. Veuillez réessayer plus tard."
    )]
    RateLimited,

    #[error("La clé API n'est pas configurée. Veuillez contacter l'administrateur.")]
    MissingCredential,

    #[error("Désolé, une erreur est survenue lors de la génération de la réponse. Veuillez réessayer.")]
    Unknown(String),
}

impl CompletionError {
    /// Provider-side detail for logs; never shown to the user.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CompletionError::Unknown(detail) => Some(detail),
            _ => None,
        }
    }
}
