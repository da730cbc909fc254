//! Wire-backed authentication: POSTs credentials to the role-specific login
//! endpoint and maps the response envelope to a login grant.

use crate::envelope::Envelope;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use veritag_core::{AuthBackend, AuthError, Credentials, LoginGrant, Role, UserInfo};

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
    user: UserInfo,
}

/// Authenticates against the console backend's login endpoint.
pub struct HttpAuthBackend {
    client: Client,
    base_url: String,
    role: Role,
}

impl HttpAuthBackend {
    /// `role` selects the login endpoint; the granted identity still carries
    /// its own role from the server.
    pub fn new(base_url: impl Into<String>, role: Role) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            role,
        }
    }

    fn login_path(&self) -> &'static str {
        match self.role {
            Role::Platform => "/platform/auth/login",
            Role::Merchant => "/merchant/auth/login",
        }
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn authenticate(&self, credentials: &Credentials) -> Result<LoginGrant, AuthError> {
        let url = format!("{}{}", self.base_url, self.login_path());
        debug!(%url, username = %credentials.username, "posting login");

        let response = self
            .client
            .post(url)
            .json(credentials)
            .send()
            .await
            .map_err(|err| AuthError::Backend(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Backend(format!(
                "login endpoint returned {status}"
            )));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|err| AuthError::Backend(err.to_string()))?;
        if !envelope.is_success() {
            // Business-level rejection of the credentials themselves.
            return Err(AuthError::InvalidCredentials);
        }

        let data: LoginData = serde_json::from_value(envelope.data)
            .map_err(|err| AuthError::Backend(format!("malformed login response: {err}")))?;

        Ok(LoginGrant {
            token: data.token,
            user: data.user,
        })
    }
}
