//! Conversation orchestration and repository trait definitions for wachat.
//!
//! This crate defines the "ports" (repository, session-store, and completion
//! provider traits) that the infrastructure layer implements, plus the
//! `ConversationOrchestrator` that sequences a conversational turn. It depends
//! only on `wachat-types` -- never on `wachat-infra` or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod llm;
pub mod repository;
