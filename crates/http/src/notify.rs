//! Notification sink boundary.
//!
//! The user-facing widget is out of scope; the pipeline only needs a
//! fire-and-forget `notify` to report classified failures through.

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Info,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Routes notifications to the log when no widget is wired in.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => warn!(target: "veritag::notify", "{message}"),
            Severity::Info => info!(target: "veritag::notify", "{message}"),
        }
    }
}
