//! Ports: the traits the sync use case needs from the outside world.
//!
//! [`SyncTransport`] reaches the remote pull and notify endpoints;
//! [`ConfigRepository`] reads and replaces the local store.  Adapters for both
//! live in the infrastructure layer and are injected into
//! [`crate::application::sync_config::ConfigSyncClient`] at construction time.

use std::path::PathBuf;

use async_trait::async_trait;
use config_sync_core::{ConfigStore, NotifyRequest, PullRequest, StoreError};
use thiserror::Error;

/// Network-level failure talking to the pull or notify endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {0}")]
    Build(String),

    /// The request did not produce a response (DNS, connect, timeout, ...).
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The endpoint answered with a non-success HTTP status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read as text.
    #[error("could not read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// Failure reading or replacing the local store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store exists but is not a well-formed `key=value` document.
    #[error("store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    /// The entries handed to `save` cannot be represented in the store.
    #[error("refusing to write invalid store: {0}")]
    InvalidEntry(#[from] StoreError),
}

/// Sends the pull and notify requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SyncTransport: Send + Sync {
    /// POSTs `request` to the pull endpoint and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if no successful response was received.
    async fn send_pull(&self, url: &str, request: &PullRequest) -> Result<String, TransportError>;

    /// POSTs `request` to the notify endpoint and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if no successful response was received.
    async fn send_notify(
        &self,
        url: &str,
        request: &NotifyRequest,
    ) -> Result<String, TransportError>;
}

/// Loads and atomically replaces the persisted store.
pub trait ConfigRepository: Send + Sync {
    /// Returns the persisted store, or `None` if it has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the store exists but cannot be read
    /// or parsed.
    fn load(&self) -> Result<Option<ConfigStore>, PersistenceError>;

    /// Replaces the persisted store with `store` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the write fails; the previous store is
    /// then left untouched.
    fn save(&self, store: &ConfigStore) -> Result<(), PersistenceError>;
}
