//! config-sync-client library entry point.
//!
//! Keeps a local `key=value` configuration store in step with a remote
//! endpoint:
//!
//! 1. Reads the locally stored version (`"0"` if there is no store yet).
//! 2. POSTs `key=<secret>&version=<local version>` to the pull endpoint.
//! 3. If the answer is `code == 2`, POSTs `key=<secret>` to the notify
//!    endpoint and atomically replaces the local store with the new entries
//!    and version.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use config_sync_client::infrastructure::{
//!     build_client,
//!     storage::settings::load_settings,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = load_settings(Path::new("/etc/myapp/sync.toml"))?;
//! let client = build_client(&settings)?;
//!
//! let outcome = client.sync(&settings.endpoints()).await?;
//! if outcome.is_updated() {
//!     println!("timeout is now {}", client.get("timeout", "30"));
//! }
//! # Ok(())
//! # }
//! ```

/// Application layer: the sync use case and its ports.
pub mod application;

/// Infrastructure layer: HTTP transport, file store, settings.
pub mod infrastructure;

pub use application::{ConfigSyncClient, PullOutcome, RemoteEndpoints, SyncError};
