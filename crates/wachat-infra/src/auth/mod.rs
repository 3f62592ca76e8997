//! Local identity provider adapters: Argon2 password hashing and the
//! on-disk session file.

pub mod hash;
pub mod session_file;

pub use hash::Argon2PasswordHasher;
pub use session_file::FileSessionPersistence;
