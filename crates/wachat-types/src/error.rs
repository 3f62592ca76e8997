use std::fmt;

use thiserror::Error;

use crate::llm::CompletionError;

/// Errors from repository operations (used by trait definitions in wachat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Input rejected before it reaches the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("le message est vide")]
    EmptyMessage,

    #[error("l'identifiant est vide")]
    EmptyIdentity,

    #[error("adresse e-mail invalide : '{0}'")]
    InvalidEmail(String),

    #[error("le mot de passe doit contenir au moins {min} caractères")]
    PasswordTooShort { min: usize },
}

/// Which side of the message store failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceOp {
    Load,
    Write,
}

impl fmt::Display for PersistenceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceOp::Load => write!(f, "load"),
            PersistenceOp::Write => write!(f, "write"),
        }
    }
}

/// Failures at the conversation-turn boundary.
///
/// Every variant maps to exactly one user-visible notification via
/// [`ChatError::user_message`].
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message store {operation} failed: {source}")]
    Persistence {
        operation: PersistenceOp,
        #[source]
        source: RepositoryError,
    },

    #[error("completion failed: {0:?}")]
    Completion(#[from] CompletionError),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl ChatError {
    pub fn load(source: RepositoryError) -> Self {
        ChatError::Persistence {
            operation: PersistenceOp::Load,
            source,
        }
    }

    pub fn write(source: RepositoryError) -> Self {
        ChatError::Persistence {
            operation: PersistenceOp::Write,
            source,
        }
    }

    /// Short tag for structured logs.
    pub fn kind(&self) -> ChatErrorKind {
        match self {
            ChatError::Persistence { .. } => ChatErrorKind::Persistence,
            ChatError::Completion(_) => ChatErrorKind::Completion,
            ChatError::Validation(_) => ChatErrorKind::Validation,
        }
    }

    /// The single human-readable notification for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Persistence {
                operation: PersistenceOp::Load,
                ..
            } => "Erreur lors du chargement des messages.".to_string(),
            ChatError::Persistence {
                operation: PersistenceOp::Write,
                ..
            } => "Une erreur est survenue lors de l'envoi du message. Veuillez réessayer.".to_string(),
            ChatError::Completion(err) => err.to_string(),
            ChatError::Validation(err) => format!("Saisie invalide : {err}."),
        }
    }
}

/// Coarse classification of a [`ChatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Persistence,
    Completion,
    Validation,
}

/// Errors from the local identity provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("un compte existe déjà pour '{0}'")]
    EmailTaken(String),

    #[error("e-mail ou mot de passe incorrect")]
    InvalidCredentials,

    #[error("vous n'êtes pas connecté")]
    NotSignedIn,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("échec du hachage du mot de passe")]
    Hashing,

    #[error("erreur de stockage : {0}")]
    Storage(String),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        AuthError::Storage(err.to_string())
    }
}
