//! Veritag console HTTP pipeline: credential stamping, envelope handling and
//! failure classification for every outbound call.

pub mod auth_backend;
pub mod client;
pub mod envelope;
pub mod notify;
pub mod reload;

pub use auth_backend::HttpAuthBackend;
pub use client::error::ClientError;
pub use client::{messages, ApiClient, ApiClientBuilder};
pub use envelope::Envelope;
pub use notify::{Notifier, Severity, TracingNotifier};
pub use reload::ReloadBoundary;
