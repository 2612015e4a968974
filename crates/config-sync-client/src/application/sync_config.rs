//! ConfigSyncClient: version-checked pull, remote notification, and atomic
//! local persistence.
//!
//! One `pull()` walks through these states:
//!
//! ```text
//! IDLE -> REQUESTING -+-> NO_UPDATE                      (code != 2)
//!                     +-> UPDATE_AVAILABLE -> NOTIFYING -> SAVING -> DONE
//!                     +-> FAILED                         (transport / protocol / persistence)
//! ```
//!
//! The notify call is fire-and-forget: its failure is logged and reported in
//! the `notified` flag of [`PullOutcome::Updated`], but the new configuration
//! is saved regardless.  Nothing is retried; callers decide whether to call again.
//!
//! The store is loaded lazily on first access and cached.  The client assumes
//! it is the only writer of its store path.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use config_sync_core::{
    decode_pull_response, ConfigEntry, ConfigStore, ConfigVersion, NotifyRequest,
    ProtocolError, PullReply, PullRequest,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::ports::{
    ConfigRepository, PersistenceError, SyncTransport, TransportError,
};

/// Why a pull (or a direct save) failed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result of a pull that reached the endpoint and got a decodable answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// A new bundle was saved.
    Updated {
        /// The version now stored locally.
        version: ConfigVersion,
        /// Number of entries the endpoint sent.
        entries: usize,
        /// Whether the notify endpoint accepted the notification.
        notified: bool,
    },
    /// The endpoint answered with a code other than 2; nothing changed.
    NoUpdate { code: i64 },
}

impl PullOutcome {
    /// `true` for [`PullOutcome::Updated`].
    pub fn is_updated(&self) -> bool {
        matches!(self, PullOutcome::Updated { .. })
    }
}

/// Pull and notify endpoints plus the shared secret sent to both.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteEndpoints {
    pub pull_url: String,
    pub notify_url: String,
    pub secret_key: String,
}

impl std::fmt::Debug for RemoteEndpoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEndpoints")
            .field("pull_url", &self.pull_url)
            .field("notify_url", &self.notify_url)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// The config sync use case.
///
/// Construct one per store path and share it (e.g. in an `Arc`) with
/// everything that reads configuration.
pub struct ConfigSyncClient {
    transport: Arc<dyn SyncTransport>,
    repository: Arc<dyn ConfigRepository>,
    /// Never held across an `.await`.
    cache: Mutex<StoreCache>,
}

/// What the client knows about its store between calls.
#[derive(Default)]
struct StoreCache {
    /// `None` until the store is first read successfully.
    store: Option<ConfigStore>,
    /// Set after a failed load; reads then see an empty store without
    /// touching the repository again until the next save.
    unreadable: bool,
}

impl ConfigSyncClient {
    /// Creates a client over the given transport and store.  Nothing is read
    /// until the first access.
    pub fn new(transport: Arc<dyn SyncTransport>, repository: Arc<dyn ConfigRepository>) -> Self {
        Self {
            transport,
            repository,
            cache: Mutex::new(StoreCache::default()),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    /// Returns the local version, or `"0"` if the store is absent or has no
    /// `version` entry.
    ///
    /// An unreadable store is treated as absent (and logged), so the next pull
    /// asks for a full bundle and overwrites it.
    pub fn get_version(&self) -> ConfigVersion {
        self.read_or_absent(ConfigStore::version)
    }

    /// Returns the value for `key`, or `default` if the store is absent or the
    /// key is missing.  Keys match exactly and case-sensitively.
    pub fn get(&self, key: &str, default: &str) -> String {
        self.read_or_absent(|store| store.get(key).unwrap_or(default).to_string())
    }

    /// `true` iff `version` names the locally stored version.
    ///
    /// Numeric comparison when both sides are integers, exact string
    /// comparison otherwise (see [`ConfigVersion::matches`]).
    pub fn check_version(&self, version: &str) -> bool {
        self.get_version().matches(version)
    }

    /// Returns a copy of the whole store.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] if the store exists but cannot be
    /// loaded.
    pub fn snapshot(&self) -> Result<ConfigStore, SyncError> {
        Ok(self.with_store(ConfigStore::clone)?)
    }

    // ── Remote operations ────────────────────────────────────────────────────

    /// Asks the pull endpoint for a newer configuration and applies it.
    ///
    /// On `code == 2` the notify endpoint is called first (its failure does not
    /// stop the save), then the local store is replaced atomically.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Transport`] if the pull request got no usable response.
    /// - [`SyncError::Protocol`] if the response could not be decoded; nothing
    ///   is notified or written.
    /// - [`SyncError::Persistence`] if the new store could not be written.
    pub async fn pull(
        &self,
        pull_url: &str,
        key: &str,
        notify_url: &str,
    ) -> Result<PullOutcome, SyncError> {
        let current = self.get_version();
        debug!("requesting configuration from {pull_url} (local version {current})");

        let body = self
            .transport
            .send_pull(pull_url, &PullRequest::new(key, &current))
            .await?;

        let update = match decode_pull_response(&body)? {
            PullReply::NoUpdate { code } => {
                debug!("no configuration update from {pull_url} (code {code})");
                return Ok(PullOutcome::NoUpdate { code });
            }
            PullReply::Update(update) => update,
        };

        let notified = match self.notify(notify_url, key).await {
            Ok(_) => true,
            Err(e) => {
                warn!("notify failed, saving update anyway: {e}");
                false
            }
        };

        self.save(&update.entries, &update.version)?;
        info!(
            "configuration updated from version {current} to {} ({} entries)",
            update.version,
            update.entries.len()
        );

        Ok(PullOutcome::Updated {
            version: update.version,
            entries: update.entries.len(),
            notified,
        })
    }

    /// [`pull`](Self::pull) against a configured set of endpoints.
    ///
    /// # Errors
    ///
    /// Same as [`pull`](Self::pull).
    pub async fn sync(&self, remote: &RemoteEndpoints) -> Result<PullOutcome, SyncError> {
        self.pull(&remote.pull_url, &remote.secret_key, &remote.notify_url)
            .await
    }

    /// Tells the notify endpoint that an update was received.
    ///
    /// The response body is returned uninterpreted.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the request got no successful response.
    pub async fn notify(&self, notify_url: &str, key: &str) -> Result<String, TransportError> {
        debug!("notifying {notify_url}");
        self.transport
            .send_notify(notify_url, &NotifyRequest::new(key))
            .await
    }

    // ── Writes ───────────────────────────────────────────────────────────────

    /// Replaces the whole store with `entries` plus `version`.
    ///
    /// Writing a store identical to the current one is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] if the entries are not storable or
    /// the write fails.  The cached store is only replaced after a successful
    /// write.
    pub fn save(&self, entries: &[ConfigEntry], version: &ConfigVersion) -> Result<(), SyncError> {
        let store = ConfigStore::from_update(entries, version).map_err(PersistenceError::from)?;

        let mut cache = self.lock_cache();
        if cache.store.as_ref() == Some(&store) {
            debug!("store already at version {version} with identical content; not rewriting");
            return Ok(());
        }

        self.repository.save(&store)?;
        cache.store = Some(store);
        cache.unreadable = false;
        Ok(())
    }

    // ── Cache helpers ────────────────────────────────────────────────────────

    fn lock_cache(&self) -> MutexGuard<'_, StoreCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` on the cached store, loading it first if needed.  A missing
    /// store loads as empty.  A store that failed to load earlier is retried
    /// here, so the caller always gets the current error.
    fn with_store<R>(&self, f: impl FnOnce(&ConfigStore) -> R) -> Result<R, PersistenceError> {
        let mut cache = self.lock_cache();
        if cache.store.is_none() {
            cache.store = Some(self.repository.load()?.unwrap_or_default());
            cache.unreadable = false;
        }
        Ok(f(cache.store.get_or_insert_with(ConfigStore::default)))
    }

    /// Like [`with_store`](Self::with_store), but an unreadable store reads as
    /// empty.  The failure is logged once and not retried until the next save.
    fn read_or_absent<R>(&self, f: impl FnOnce(&ConfigStore) -> R) -> R {
        let mut cache = self.lock_cache();
        if cache.store.is_none() && !cache.unreadable {
            match self.repository.load() {
                Ok(loaded) => cache.store = Some(loaded.unwrap_or_default()),
                Err(e) => {
                    warn!("treating unreadable store as absent: {e}");
                    cache.unreadable = true;
                }
            }
        }
        match &cache.store {
            Some(store) => f(store),
            None => f(&ConfigStore::default()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
