//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (wachat-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod account;
pub mod credential;
pub mod message;
pub mod session;
