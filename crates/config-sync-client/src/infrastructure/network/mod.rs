//! Network infrastructure for the client application.
//!
//! [`HttpTransport`] implements [`SyncTransport`] on top of a shared
//! `reqwest::Client`.  Both endpoints receive a form-encoded POST; the
//! response body is returned as text and left to the application layer to
//! interpret.
//!
//! Any non-2xx status counts as a transport failure, the same as a refused
//! connection: in neither case did the endpoint produce a body worth reading.

use std::time::Duration;

use async_trait::async_trait;
use config_sync_core::{NotifyRequest, PullRequest};
use serde::Serialize;
use tracing::debug;

use crate::application::ports::{SyncTransport, TransportError};

/// Configuration for the HTTP client used to reach both endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Upper bound for a whole request, connect to last body byte.
    pub request_timeout: Duration,
    /// Upper bound for establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: default_user_agent(),
        }
    }
}

/// `config-sync/<crate version>`.
pub fn default_user_agent() -> String {
    concat!("config-sync/", env!("CARGO_PKG_VERSION")).to_string()
}

/// `reqwest`-backed [`SyncTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds the underlying HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Build`] if the TLS backend cannot be
    /// initialised or the user agent is not a valid header value.
    pub fn new(config: &HttpTransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn post_form<T>(&self, url: &str, form: &T) -> Result<String, TransportError>
    where
        T: Serialize + ?Sized + Sync,
    {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        debug!("POST {url} -> {status}");
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| TransportError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SyncTransport for HttpTransport {
    async fn send_pull(&self, url: &str, request: &PullRequest) -> Result<String, TransportError> {
        self.post_form(url, request).await
    }

    async fn send_notify(
        &self,
        url: &str,
        request: &NotifyRequest,
    ) -> Result<String, TransportError> {
        self.post_form(url, request).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
