//! Veritag API client.
//!
//! Wraps every outbound request/response pair: stamps calls with the session
//! bearer token, unwraps the response envelope, and classifies every failure
//! into exactly one notification plus one returned error.

pub mod error;
pub mod merchant;
pub mod platform;
pub mod verify;

use crate::envelope::Envelope;
use crate::notify::{Notifier, Severity, TracingNotifier};
use crate::reload::ReloadBoundary;
use error::ClientError;
use reqwest::{header, Client, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use veritag_core::SessionStore;

/// User-facing failure messages, one per classification row.
pub mod messages {
    pub const SESSION_EXPIRED: &str = "Session expired, please log in again";
    pub const FORBIDDEN: &str = "Insufficient permission";
    pub const SERVER_ERROR: &str = "Internal server error";
    pub const REQUEST_FAILED: &str = "Request failed";
    pub const NETWORK_ERROR: &str = "Network error, please check your connection";
    pub const CONFIG_ERROR: &str = "Request configuration error";
}

/// Veritag API client.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    reload: Arc<dyn ReloadBoundary>,
}

impl ApiClient {
    /// Create a new client builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder, stamped with the bearer token when a
    /// session is active. A missing token is not an error at this stage.
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        let session = self.session.snapshot();
        if session.is_authenticated() {
            request = request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", session.token()),
            );
        }

        request
    }

    /// Execute a request, unwrap the envelope, and classify failures.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return Err(self.classify_transport(err)),
        };

        let status = response.status();
        if status.is_success() {
            self.unwrap_envelope(response).await
        } else {
            Err(self.classify_status(status, response).await)
        }
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, ClientError> {
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                self.notifier.notify(messages::NETWORK_ERROR, Severity::Error);
                return Err(ClientError::Network(err.to_string()));
            }
        };

        let envelope: Envelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(err) => {
                self.notifier.notify(messages::REQUEST_FAILED, Severity::Error);
                return Err(ClientError::Decode(err));
            }
        };

        if envelope.is_success() {
            serde_json::from_value(envelope.data).map_err(|err| {
                self.notifier.notify(messages::REQUEST_FAILED, Severity::Error);
                ClientError::Decode(err)
            })
        } else {
            let message = if envelope.message.is_empty() {
                messages::REQUEST_FAILED.to_string()
            } else {
                envelope.message
            };
            self.notifier.notify(&message, Severity::Error);
            Err(ClientError::Application {
                code: envelope.code,
                message,
            })
        }
    }

    async fn classify_status(&self, status: StatusCode, response: Response) -> ClientError {
        match status.as_u16() {
            401 => {
                warn!("request rejected with 401, invalidating session");
                self.notifier.notify(messages::SESSION_EXPIRED, Severity::Error);
                // Concurrent 401s race here; only the latch winner clears
                // the session and forces the reload.
                if self.session.claim_expiry() {
                    self.session.logout().await;
                    self.reload.redirect_to_login();
                }
                ClientError::Unauthorized
            }
            403 => {
                self.notifier.notify(messages::FORBIDDEN, Severity::Error);
                ClientError::Forbidden
            }
            500 => {
                self.notifier.notify(messages::SERVER_ERROR, Severity::Error);
                ClientError::ServerError
            }
            _ => {
                let message = response
                    .text()
                    .await
                    .ok()
                    .and_then(|body| serde_json::from_str::<Envelope>(&body).ok())
                    .map(|envelope| envelope.message)
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| messages::REQUEST_FAILED.to_string());
                self.notifier.notify(&message, Severity::Error);
                ClientError::Other {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }

    fn classify_transport(&self, err: reqwest::Error) -> ClientError {
        if err.is_builder() {
            self.notifier.notify(messages::CONFIG_ERROR, Severity::Error);
            ClientError::Config(err.to_string())
        } else {
            warn!(%err, "request did not complete");
            self.notifier.notify(messages::NETWORK_ERROR, Severity::Error);
            ClientError::Network(err.to_string())
        }
    }
}

/// Builder for [`ApiClient`].
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    session: Option<Arc<SessionStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    reload: Option<Arc<dyn ReloadBoundary>>,
}

impl ApiClientBuilder {
    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the session store used for bearer stamping and invalidation.
    pub fn session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the notification sink. Defaults to [`TracingNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the reload boundary invoked after session invalidation.
    pub fn reload_boundary(mut self, reload: Arc<dyn ReloadBoundary>) -> Self {
        self.reload = Some(reload);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Config("base_url is required".into()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let session = self
            .session
            .ok_or_else(|| ClientError::Config("session store is required".into()))?;
        let reload = self
            .reload
            .ok_or_else(|| ClientError::Config("reload boundary is required".into()))?;
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(TracingNotifier));

        let mut client_builder = ClientBuilder::new();

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        } else {
            client_builder = client_builder.user_agent("veritag-console/0.1.0");
        }

        let client = client_builder
            .build()
            .map_err(|err| ClientError::Config(err.to_string()))?;

        Ok(ApiClient {
            client,
            base_url,
            session,
            notifier,
            reload,
        })
    }
}
