//! Client error taxonomy.

use thiserror::Error;

/// Classified outcome of a failed call.
///
/// Every variant has already been reported through the notification sink by
/// the time the caller sees it; `Unauthorized` has additionally invalidated
/// the session and signaled the reload boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the bearer token (401).
    #[error("session expired")]
    Unauthorized,

    /// Authenticated but not allowed (403).
    #[error("insufficient permission")]
    Forbidden,

    /// The server fell over (500).
    #[error("internal server error")]
    ServerError,

    /// Any other non-success transport status.
    #[error("unexpected status {status}: {message}")]
    Other { status: u16, message: String },

    /// The request was sent but no response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The request could not be constructed or the client is misconfigured.
    #[error("request configuration error: {0}")]
    Config(String),

    /// Business-rule failure inside a transport-successful response.
    #[error("{message} (code {code})")]
    Application { code: i64, message: String },

    /// The response body did not match the envelope contract.
    #[error("response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
