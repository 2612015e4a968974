//! File-backed [`ConfigRepository`].
//!
//! The store lives in a single text file (see
//! [`config_sync_core::ConfigStore`] for the format).  Every save replaces
//! the file in one step:
//!
//! 1. write the rendered store to a temporary file in the same directory,
//! 2. `fsync` it,
//! 3. rename it over the target.
//!
//! A reader therefore sees either the previous store or the new one, never a
//! half-written file, even if the process dies mid-save.

use std::io::Write;
use std::path::{Path, PathBuf};

use config_sync_core::ConfigStore;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::application::ports::{ConfigRepository, PersistenceError};

/// Stores the configuration at a fixed path.
#[derive(Debug, Clone)]
pub struct FileConfigRepository {
    path: PathBuf,
}

impl FileConfigRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the staging file is created in.  Must be on the same file
    /// system as the target for the rename to be atomic.
    fn staging_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
        move |source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ConfigRepository for FileConfigRepository {
    fn load(&self) -> Result<Option<ConfigStore>, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => ConfigStore::parse(&text)
                .map(Some)
                .map_err(|source| PersistenceError::Corrupt {
                    path: self.path.clone(),
                    source,
                }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&self, store: &ConfigStore) -> Result<(), PersistenceError> {
        let dir = self.staging_dir();
        std::fs::create_dir_all(dir).map_err(Self::io_error(dir))?;

        let mut staging = NamedTempFile::new_in(dir).map_err(Self::io_error(dir))?;

        // Keep the mode of an existing store; a fresh one gets the temp file's
        // owner-only permissions.
        if let Ok(meta) = std::fs::metadata(&self.path) {
            staging
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(Self::io_error(staging.path()))?;
        }

        staging
            .write_all(store.render().as_bytes())
            .map_err(Self::io_error(staging.path()))?;
        staging
            .as_file()
            .sync_all()
            .map_err(Self::io_error(staging.path()))?;

        staging
            .persist(&self.path)
            .map_err(|e| PersistenceError::Io {
                path: self.path.clone(),
                source: e.error,
            })?;

        debug!(
            "wrote {} entries (version {}) to {}",
            store.len(),
            store.version(),
            self.path.display()
        );
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
