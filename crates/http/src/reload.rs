//! Hard-navigation escape hatch.

/// Invoked after a session has been invalidated by an authentication
/// failure: the embedding shell must discard all in-memory state and start
/// over at the login entry point. This is a full-reload signal, not an
/// in-app route change.
pub trait ReloadBoundary: Send + Sync {
    fn redirect_to_login(&self);
}
