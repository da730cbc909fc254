//! Veritag console core: session state, persistence and authentication seams.

pub mod access;
pub mod error;
pub mod session;
pub mod storage;
pub mod types;

pub use access::{AuthBackend, DemoAuthBackend, LoginGrant};
pub use error::{AuthError, StorageError};
pub use session::{Session, SessionKeys, SessionStore};
pub use storage::{KvStore, MemoryStore};
pub use types::{Credentials, Role, UserInfo, WILDCARD_PERMISSION};

#[cfg(test)]
mod tests;
