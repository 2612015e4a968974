//! Domain entities for config-sync.
//!
//! Pure data types with no I/O.  The file and HTTP adapters live in the
//! `config-sync-client` crate and depend on these types, never the other way
//! around.

/// The persisted key-value mapping and its text format.
pub mod store;

/// Configuration version identifiers and their comparison rule.
pub mod version;
