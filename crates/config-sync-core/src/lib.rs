//! # config-sync-core
//!
//! Shared library for config-sync containing the local store model, version
//! comparison rules, and the pull/notify wire types.
//!
//! It has zero dependencies on network sockets, HTTP clients, or the file
//! system, so everything here can be tested with plain strings.
//!
//! # Overview
//!
//! A config-sync client keeps a flat `key=value` configuration bundle on disk
//! and periodically asks a remote endpoint whether a newer bundle exists:
//!
//! - **`domain`** – The [`ConfigStore`] mapping, its reserved `version` entry,
//!   and the on-disk text format.  [`ConfigVersion`] implements the
//!   "same version?" comparison.
//!
//! - **`protocol`** – The form bodies sent to the pull and notify endpoints and
//!   the decoder that turns a JSON pull response into either "no update" or a
//!   validated [`ConfigUpdate`].

pub mod domain;
pub mod protocol;

pub use domain::store::{ConfigEntry, ConfigStore, StoreError, VERSION_KEY};
pub use domain::version::ConfigVersion;
pub use protocol::codec::{decode_pull_response, ProtocolError};
pub use protocol::messages::{ConfigUpdate, NotifyRequest, PullReply, PullRequest};
