//! Shared helpers for the config-sync-client integration tests.

use std::path::Path;

use config_sync_client::infrastructure::{
    build_client,
    storage::settings::{RemoteSettings, SyncSettings},
};
use config_sync_client::ConfigSyncClient;
use tracing_subscriber::EnvFilter;

pub const SECRET: &str = "integration-secret";

/// Installs a test-writer subscriber once per test binary.  Set `RUST_LOG`
/// to see the client's logs for a failing test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Settings pointing at `server_url` with the store under `dir`.
pub fn settings_for(server_url: &str, dir: &Path) -> SyncSettings {
    SyncSettings {
        store_path: dir.join("remote.conf"),
        remote: RemoteSettings {
            pull_url: format!("{server_url}/pull"),
            notify_url: format!("{server_url}/notify"),
            secret_key: SECRET.to_string(),
        },
        ..Default::default()
    }
}

/// A real client (reqwest + file store) for `settings`.
pub fn client_for(settings: &SyncSettings) -> ConfigSyncClient {
    build_client(settings).expect("settings must be valid")
}
