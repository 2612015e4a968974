//! Storage infrastructure: the local store and the client's own settings.
//!
//! - `file_store` – [`file_store::FileConfigRepository`], the atomic
//!   file-backed implementation of the `ConfigRepository` port.
//! - `settings` – Reading and writing the TOML settings file that tells a
//!   client where its store is and which endpoints to use.

pub mod file_store;
pub mod settings;
