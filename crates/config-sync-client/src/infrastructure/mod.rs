//! Infrastructure layer for the client application.
//!
//! Contains the adapters behind the application-layer ports and the function
//! that wires them together.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `config_sync_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`network`** – `reqwest`-based implementation of `SyncTransport`.
//! - **`storage`** – Atomic file store and the TOML settings loader.

use std::sync::Arc;

use tracing::info;

use crate::application::sync_config::ConfigSyncClient;

pub mod network;
pub mod storage;

use network::HttpTransport;
use storage::file_store::FileConfigRepository;
use storage::settings::{SettingsError, SyncSettings};

/// Builds a client that talks HTTP to the configured endpoints and keeps its
/// store at `settings.store_path`.
///
/// Build one client per store path and share it; two clients over the same
/// path would each cache their own view of the store.
///
/// # Errors
///
/// Returns [`SettingsError::Invalid`] if the settings fail validation, or
/// [`SettingsError::Transport`] if the HTTP client cannot be built.
pub fn build_client(settings: &SyncSettings) -> Result<ConfigSyncClient, SettingsError> {
    settings.validate()?;

    let transport = HttpTransport::new(&settings.transport_config())?;
    let repository = FileConfigRepository::new(&settings.store_path);
    info!(
        "config sync client ready (store {}, pull endpoint {})",
        settings.store_path.display(),
        settings.remote.pull_url
    );

    Ok(ConfigSyncClient::new(
        Arc::new(transport),
        Arc::new(repository),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::settings::RemoteSettings;

    #[test]
    fn test_build_client_rejects_invalid_settings() {
        let result = build_client(&SyncSettings::default());
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_build_client_over_missing_store_reports_initial_version() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let settings = SyncSettings {
            store_path: dir.path().join("remote.conf"),
            remote: RemoteSettings {
                pull_url: "http://127.0.0.1:1/pull".to_string(),
                notify_url: "http://127.0.0.1:1/notify".to_string(),
                secret_key: "k".to_string(),
            },
            ..Default::default()
        };

        // Act
        let client = build_client(&settings).expect("build");

        // Assert
        assert_eq!(client.get_version().as_str(), "0");
        assert_eq!(client.get("anything", "fallback"), "fallback");
    }
}
