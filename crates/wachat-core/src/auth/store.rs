//! The observable "current session" seam.
//!
//! Consumers take a `watch::Receiver` once, at construction, and own it.
//! Dropping the receiver is the unsubscribe.

use tokio::sync::watch;
use wachat_types::session::Session;

pub trait SessionStore: Send + Sync {
    /// One-shot query. Expired sessions read as `None`.
    fn current(&self) -> Option<Session>;

    /// A fresh subscription that observes every later session change.
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}
