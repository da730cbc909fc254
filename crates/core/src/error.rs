//! Core error types.

use thiserror::Error;

/// Failures of the persistent key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }
}

/// Failures of the login flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credentials were rejected. The existing session is untouched.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The authentication backend could not be reached or misbehaved.
    #[error("authentication backend error: {0}")]
    Backend(String),

    /// The login was granted but the session could not be persisted.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}
