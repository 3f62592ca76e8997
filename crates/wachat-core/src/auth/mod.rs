//! Local identity: accounts, password hashing, and the observable session.

pub mod hash;
pub mod service;
pub mod store;
pub mod validation;

pub use hash::PasswordHasher;
pub use service::AuthService;
pub use store::SessionStore;
