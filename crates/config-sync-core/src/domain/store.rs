//! The local configuration store.
//!
//! A [`ConfigStore`] is a flat mapping from string key to string value plus
//! the reserved `version` entry.  On disk it is plain UTF-8 text:
//!
//! ```text
//! log_level=debug
//! timeout=30
//! version=5
//! ```
//!
//! - One `key=value` pair per line, split on the **first** `=` so values may
//!   contain `=` themselves.
//! - Entries are written sorted by key; `version` always comes last.
//! - Blank lines are ignored when reading; any other line without `=` makes
//!   the whole store invalid.
//!
//! Keys may not be empty or contain `=`, `\n` or `\r`; values and versions may
//! not contain line breaks.  These rules are what keep every store that was
//! written by [`ConfigStore::render`] readable by [`ConfigStore::parse`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::version::ConfigVersion;

/// Name of the reserved entry holding the store's version.
pub const VERSION_KEY: &str = "version";

/// Errors raised while parsing or building a store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A non-blank line had no `=` or an empty key.
    #[error("malformed line {line_no}: {line:?}")]
    MalformedLine { line_no: usize, line: String },

    /// The key cannot be represented in the store format.
    #[error("invalid key {0:?}")]
    InvalidKey(String),

    /// The value for `key` contains a line break.
    #[error("invalid value for key {key:?}: line breaks are not allowed")]
    InvalidValue { key: String },

    /// The version is empty or contains a line break.
    #[error("invalid version {0:?}")]
    InvalidVersion(String),
}

/// A single `{key, value}` pair as sent in `data.config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Checks that the entry survives a render/parse cycle unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] or [`StoreError::InvalidValue`].
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.key.is_empty() || self.key.contains(&['=', '\n', '\r'][..]) {
            return Err(StoreError::InvalidKey(self.key.clone()));
        }
        if has_line_break(&self.value) {
            return Err(StoreError::InvalidValue {
                key: self.key.clone(),
            });
        }
        Ok(())
    }
}

/// The persisted configuration: entries plus the reserved version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    entries: BTreeMap<String, String>,
    version: Option<ConfigVersion>,
}

impl ConfigStore {
    /// Creates an empty store with no version (equivalent to "never synced").
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store that replaces the current one after a pull.
    ///
    /// Later duplicates of a key win.  An entry named `version` is dropped:
    /// the update's own version is authoritative.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any entry or the version cannot be
    /// represented in the store format.
    pub fn from_update<'a, I>(entries: I, version: &ConfigVersion) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = &'a ConfigEntry>,
    {
        version.validate()?;

        let mut map = BTreeMap::new();
        for entry in entries {
            entry.validate()?;
            if entry.key == VERSION_KEY {
                warn!("dropping reserved key {VERSION_KEY:?} from config payload");
                continue;
            }
            map.insert(entry.key.clone(), entry.value.clone());
        }

        Ok(Self {
            entries: map,
            version: Some(version.clone()),
        })
    }

    /// Parses the on-disk text form.
    ///
    /// Empty text yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedLine`] for the first line that is not
    /// blank and not a `key=value` pair.
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        let mut store = Self::new();

        for (idx, raw) in text.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if line.trim().is_empty() {
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((key, value)) if !key.is_empty() => (key, value),
                _ => {
                    return Err(StoreError::MalformedLine {
                        line_no: idx + 1,
                        line: line.to_string(),
                    })
                }
            };

            if key == VERSION_KEY {
                store.version = Some(ConfigVersion::new(value));
            } else {
                store.entries.insert(key.to_string(), value.to_string());
            }
        }

        Ok(store)
    }

    /// Serialises the store to its on-disk text form.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        if let Some(version) = &self.version {
            out.push_str(VERSION_KEY);
            out.push('=');
            out.push_str(version.as_str());
            out.push('\n');
        }
        out
    }

    /// Looks up `key` by exact, case-sensitive match.
    ///
    /// `get("version")` returns the stored version, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == VERSION_KEY {
            return self.version.as_ref().map(ConfigVersion::as_str);
        }
        self.entries.get(key).map(String::as_str)
    }

    /// The stored version, or `"0"` when the store has none.
    pub fn version(&self) -> ConfigVersion {
        self.version.clone().unwrap_or_default()
    }

    /// The stored version only if the `version` entry is present.
    pub fn stored_version(&self) -> Option<&ConfigVersion> {
        self.version.as_ref()
    }

    /// Number of entries, not counting `version`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when there are no entries and no version.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.version.is_none()
    }

    /// Iterates over the entries (excluding `version`) in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

pub(crate) fn has_line_break(s: &str) -> bool {
    s.contains(&['\n', '\r'][..])
}

// ── Tests ─────────────────────────────────────────────────────────────────────
