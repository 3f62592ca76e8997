//! Shared domain types for wachat.
//!
//! This crate contains the domain types used across the workspace:
//! chat messages, sessions and accounts, completion requests, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod message;
pub mod session;
