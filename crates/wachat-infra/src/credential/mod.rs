//! Credential sources for the completion provider's API key.
//!
//! Default chain order: `[EnvCredentialSource, KeychainCredentialSource]`.
//! The resulting [`CredentialChain`] lives in `wachat-core`.

pub mod env;
pub mod keychain;

use std::sync::Arc;

use wachat_core::repository::credential::{CredentialChain, DynCredentialSource};

pub use env::EnvCredentialSource;
pub use keychain::KeychainCredentialSource;

/// Environment first, then the OS keychain (if available).
///
/// The keychain may be unavailable on headless machines; pass `None` there.
pub fn build_credential_chain(keychain: Option<KeychainCredentialSource>) -> CredentialChain {
    let mut sources: Vec<DynCredentialSource> = vec![Arc::new(EnvCredentialSource::new())];
    if let Some(kc) = keychain {
        sources.push(Arc::new(kc));
    }
    CredentialChain::new(sources)
}
