//! Pluggable credential verification.

use crate::error::AuthError;
use crate::types::{Credentials, Role, UserInfo, WILDCARD_PERMISSION};
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: String,
    pub user: UserInfo,
}

/// Establishes identity from credentials.
///
/// The session store does not care where verification happens; a backend may
/// check a hard-coded table, call a login endpoint, or anything in between.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError>;
}

/// Backend with a fixed demo credential table and simulated round-trip
/// latency. Rejections take the same time as grants.
pub struct DemoAuthBackend {
    latency: Duration,
}

impl DemoAuthBackend {
    pub fn new() -> Self {
        Self::with_latency(Duration::from_millis(1000))
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    fn mint_token(role: Role) -> String {
        format!("{}-{}", role.as_str(), Uuid::new_v4())
    }
}

impl Default for DemoAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthBackend for DemoAuthBackend {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        tokio::time::sleep(self.latency).await;

        let user = match (credentials.username.as_str(), credentials.password.as_str()) {
            ("admin", "admin123") => UserInfo {
                id: 1,
                username: "admin".to_string(),
                display_name: "Platform Administrator".to_string(),
                role: Role::Platform,
                merchant_id: None,
                permissions: [WILDCARD_PERMISSION.to_string()].into_iter().collect(),
            },
            ("merchant", "merchant123") => UserInfo {
                id: 1001,
                username: "merchant".to_string(),
                display_name: "Demo Merchant".to_string(),
                role: Role::Merchant,
                merchant_id: Some(1001),
                permissions: [
                    "codes:read".to_string(),
                    "codes:write".to_string(),
                    "verifies:read".to_string(),
                ]
                .into_iter()
                .collect(),
            },
            _ => return Err(AuthError::InvalidCredentials),
        };

        Ok(LoginGrant {
            token: Self::mint_token(user.role),
            user,
        })
    }
}
