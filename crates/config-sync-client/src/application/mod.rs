//! Application layer for the config sync client.
//!
//! - **`ports`** – The [`ports::SyncTransport`] and [`ports::ConfigRepository`]
//!   traits plus their error types.  The use case only talks to the outside
//!   world through these, so it can be tested with in-memory fakes.
//!
//! - **`sync_config`** – [`sync_config::ConfigSyncClient`], the
//!   pull-check-notify-save use case.

pub mod ports;
pub mod sync_config;

pub use ports::{ConfigRepository, PersistenceError, SyncTransport, TransportError};
pub use sync_config::{ConfigSyncClient, PullOutcome, RemoteEndpoints, SyncError};
