//! Session lifecycle: login, logout, persistence and derived state.

use crate::access::AuthBackend;
use crate::error::{AuthError, StorageError};
use crate::storage::KvStore;
use crate::types::{Credentials, Role, UserInfo};
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Fixed names of the persisted session keys.
pub struct SessionKeys;

impl SessionKeys {
    pub const TOKEN: &'static str = "auth_token";
    pub const USER_INFO: &'static str = "user_info";
    pub const USER_TYPE: &'static str = "user_type";

    pub const ALL: [&'static str; 3] = [Self::TOKEN, Self::USER_INFO, Self::USER_TYPE];
}

/// A coherent view of the authenticated identity.
///
/// Values are only built by [`Session::empty`] and [`Session::authenticated`],
/// so a non-empty token always comes with a populated identity and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: Option<UserInfo>,
}

impl Session {
    pub fn empty() -> Self {
        Self {
            token: String::new(),
            user: None,
        }
    }

    pub fn authenticated(token: String, user: UserInfo) -> Self {
        debug_assert!(!token.is_empty());
        Self {
            token,
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    /// False when unauthenticated; wildcard-aware otherwise.
    pub fn has_permission(&self, permission: &str) -> bool {
        match &self.user {
            Some(user) => user.has_permission(permission),
            None => false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::empty()
    }
}

/// Owns the current session and keeps the persisted copy in step with it.
///
/// Readers take lock-free snapshots; mutations serialize on a write gate and
/// publish a complete [`Session`] value, so no observer ever sees a
/// half-updated token/identity pair.
pub struct SessionStore {
    current: ArcSwap<Session>,
    storage: Arc<dyn KvStore>,
    backend: Arc<dyn AuthBackend>,
    write_gate: Mutex<()>,
    expiry_claimed: AtomicBool,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KvStore>, backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            current: ArcSwap::from_pointee(Session::empty()),
            storage,
            backend,
            write_gate: Mutex::new(()),
            expiry_claimed: AtomicBool::new(false),
        }
    }

    /// Restore the persisted session, once, at startup.
    ///
    /// Never fails: unreadable storage, missing keys, corrupt identity JSON
    /// or a role string that disagrees with the identity all degrade to the
    /// empty session.
    pub async fn hydrate(&self) {
        let token = self.read_key(SessionKeys::TOKEN).await;
        let user_json = self.read_key(SessionKeys::USER_INFO).await;
        let role = self.read_key(SessionKeys::USER_TYPE).await;

        let any_present = token.is_some() || user_json.is_some() || role.is_some();

        match Self::restore(token, user_json, role) {
            Some(session) => {
                debug!(
                    username = session.user().map(|u| u.username.as_str()),
                    "restored persisted session"
                );
                self.current.store(Arc::new(session));
            }
            None => {
                if any_present {
                    warn!("discarding incoherent persisted session");
                }
                self.current.store(Arc::new(Session::empty()));
            }
        }
    }

    fn restore(
        token: Option<String>,
        user_json: Option<String>,
        role: Option<String>,
    ) -> Option<Session> {
        let token = token.filter(|t| !t.is_empty())?;
        let user: UserInfo = serde_json::from_str(&user_json?).ok()?;
        let role = Role::parse(&role?)?;
        if role != user.role {
            return None;
        }
        Some(Session::authenticated(token, user))
    }

    async fn read_key(&self, key: &'static str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "failed to read persisted session key");
                None
            }
        }
    }

    /// Authenticate and establish a new session.
    ///
    /// On success the three session keys are persisted as one batch before
    /// the in-memory snapshot is published. On failure the existing session
    /// is untouched. Concurrent calls serialize; the last successful writer
    /// wins.
    pub async fn login(&self, credentials: Credentials) -> Result<UserInfo, AuthError> {
        let _gate = self.write_gate.lock().await;

        let grant = self.backend.authenticate(&credentials).await?;
        let user_json = serde_json::to_string(&grant.user).map_err(StorageError::from)?;

        self.storage
            .set_many(&[
                (SessionKeys::TOKEN, grant.token.clone()),
                (SessionKeys::USER_INFO, user_json),
                (SessionKeys::USER_TYPE, grant.user.role.as_str().to_string()),
            ])
            .await?;

        info!(username = %grant.user.username, role = %grant.user.role, "login succeeded");
        let user = grant.user.clone();
        self.current
            .store(Arc::new(Session::authenticated(grant.token, grant.user)));
        self.expiry_claimed.store(false, Ordering::SeqCst);

        Ok(user)
    }

    /// Clear the session in memory and storage. Idempotent, always succeeds;
    /// a failed storage removal is logged and the in-memory session is
    /// cleared regardless.
    pub async fn logout(&self) {
        let _gate = self.write_gate.lock().await;

        if let Err(err) = self.storage.remove_many(&SessionKeys::ALL).await {
            warn!(%err, "failed to clear persisted session");
        }
        self.current.store(Arc::new(Session::empty()));
        info!("logged out");
    }

    /// One-shot latch for session-expiry handling. The first caller after a
    /// login wins; the latch resets only on the next successful login.
    pub fn claim_expiry(&self) -> bool {
        self.expiry_claimed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Current session snapshot.
    pub fn snapshot(&self) -> Arc<Session> {
        self.current.load_full()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.load().is_authenticated()
    }

    pub fn is_platform(&self) -> bool {
        self.current.load().role() == Some(Role::Platform)
    }

    pub fn is_merchant(&self) -> bool {
        self.current.load().role() == Some(Role::Merchant)
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.current.load().user().cloned()
    }

    pub fn check_permission(&self, permission: &str) -> bool {
        self.current.load().has_permission(permission)
    }
}
