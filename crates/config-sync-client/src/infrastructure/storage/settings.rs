//! TOML settings for a config sync client.
//!
//! The settings say where the local store lives, which endpoints to talk to,
//! and how patient the HTTP client should be:
//!
//! ```toml
//! store_path = "/var/lib/myapp/remote.conf"
//!
//! [remote]
//! pull_url = "https://config.example.com/pull"
//! notify_url = "https://config.example.com/notify"
//! secret_key = "shared-secret"
//!
//! [http]
//! request_timeout_secs = 30
//! connect_timeout_secs = 10
//! user_agent = "config-sync/0.1.0"
//! ```
//!
//! Every field has a serde default, so a missing file or a partial file still
//! loads.  The defaults are not usable on their own (there is no default
//! endpoint); [`SyncSettings::validate`] says what is missing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::TransportError;
use crate::application::sync_config::RemoteEndpoints;
use crate::infrastructure::network::{default_user_agent, HttpTransportConfig};

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The settings parsed but cannot be used.
    #[error("invalid settings: {0}")]
    Invalid(String),

    /// The HTTP client could not be built from the settings.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// Top-level settings document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncSettings {
    /// Path of the local `key=value` store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

/// Endpoints and shared secret.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteSettings {
    #[serde(default)]
    pub pull_url: String,
    #[serde(default)]
    pub notify_url: String,
    #[serde(default)]
    pub secret_key: String,
}

impl std::fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("pull_url", &self.pull_url)
            .field("notify_url", &self.notify_url)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// HTTP client tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpSettings {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("config-sync.conf")
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            remote: RemoteSettings::default(),
            http: HttpSettings::default(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl SyncSettings {
    /// Checks that the settings can drive a sync.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(SettingsError::Invalid("store_path is empty".to_string()));
        }
        check_http_url("remote.pull_url", &self.remote.pull_url)?;
        check_http_url("remote.notify_url", &self.remote.notify_url)?;
        if self.remote.secret_key.is_empty() {
            return Err(SettingsError::Invalid(
                "remote.secret_key is empty".to_string(),
            ));
        }
        if self.http.request_timeout_secs == 0 || self.http.connect_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "http timeouts must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// The endpoints to pass to `ConfigSyncClient::sync`.
    pub fn endpoints(&self) -> RemoteEndpoints {
        RemoteEndpoints {
            pull_url: self.remote.pull_url.clone(),
            notify_url: self.remote.notify_url.clone(),
            secret_key: self.remote.secret_key.clone(),
        }
    }

    /// The HTTP client configuration described by the `[http]` table.
    pub fn transport_config(&self) -> HttpTransportConfig {
        HttpTransportConfig {
            request_timeout: Duration::from_secs(self.http.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
            user_agent: self.http.user_agent.clone(),
        }
    }
}

fn check_http_url(field: &str, url: &str) -> Result<(), SettingsError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else if url.is_empty() {
        Err(SettingsError::Invalid(format!("{field} is empty")))
    } else {
        Err(SettingsError::Invalid(format!(
            "{field} must be an http or https URL, got {url:?}"
        )))
    }
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Loads settings from `path`, returning `SyncSettings::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not found",
/// and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(path: &Path) -> Result<SyncSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SyncSettings::default()),
        Err(e) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `settings` to `path`, creating the parent directory if needed.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system failures or
/// [`SettingsError::Serialize`] if serialization fails.
pub fn save_settings(path: &Path, settings: &SyncSettings) -> Result<(), SettingsError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> SyncSettings {
        SyncSettings {
            store_path: PathBuf::from("/tmp/remote.conf"),
            remote: RemoteSettings {
                pull_url: "https://config.example.com/pull".to_string(),
                notify_url: "https://config.example.com/notify".to_string(),
                secret_key: "s3cret".to_string(),
            },
            http: HttpSettings::default(),
        }
    }

    #[test]
    fn test_default_settings_have_expected_timeouts() {
        // Arrange / Act
        let settings = SyncSettings::default();

        // Assert
        assert_eq!(settings.http.request_timeout_secs, 30);
        assert_eq!(settings.http.connect_timeout_secs, 10);
        assert_eq!(settings.store_path, PathBuf::from("config-sync.conf"));
    }

    #[test]
    fn test_default_settings_do_not_validate() {
        assert!(matches!(
            SyncSettings::default().validate(),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_complete_settings_validate() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut settings = valid_settings();
        settings.remote.pull_url = "ftp://config.example.com/pull".to_string();

        let err = settings.validate().unwrap_err().to_string();

        assert!(err.contains("remote.pull_url"), "unexpected message: {err}");
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let mut settings = valid_settings();
        settings.remote.secret_key.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut settings = valid_settings();
        settings.http.connect_timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_deserialize_minimal_toml_uses_defaults() {
        // Arrange
        let toml_str = r#"
[remote]
pull_url = "http://localhost/pull"
"#;

        // Act
        let settings: SyncSettings = toml::from_str(toml_str).expect("deserialize minimal");

        // Assert
        assert_eq!(settings.remote.pull_url, "http://localhost/pull");
        assert_eq!(settings.remote.notify_url, "");
        assert_eq!(settings.http, HttpSettings::default());
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<SyncSettings, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_endpoints_and_transport_config_follow_settings() {
        let mut settings = valid_settings();
        settings.http.request_timeout_secs = 5;

        let endpoints = settings.endpoints();
        let transport = settings.transport_config();

        assert_eq!(endpoints.pull_url, "https://config.example.com/pull");
        assert_eq!(endpoints.secret_key, "s3cret");
        assert_eq!(transport.request_timeout, Duration::from_secs(5));
        assert_eq!(transport.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_remote_settings_debug_redacts_secret() {
        let dbg = format!("{:?}", valid_settings());
        assert!(!dbg.contains("s3cret"));
    }

    #[test]
    fn test_load_settings_returns_default_when_file_absent() {
        let dir = tempfile::tempdir().unwrap();

        let settings = load_settings(&dir.path().join("missing.toml")).expect("load");

        assert_eq!(settings, SyncSettings::default());
    }

    #[test]
    fn test_save_and_load_settings_via_temp_dir() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etc").join("sync.toml");
        let settings = valid_settings();

        // Act
        save_settings(&path, &settings).expect("save");
        let loaded = load_settings(&path).expect("load");

        // Assert
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_settings_with_bad_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.toml");
        std::fs::write(&path, "store_path = [").unwrap();

        assert!(matches!(load_settings(&path), Err(SettingsError::Parse(_))));
    }
}
