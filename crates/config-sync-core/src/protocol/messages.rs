//! Message types exchanged with the pull and notify endpoints.
//!
//! Outbound requests are form-encoded (`application/x-www-form-urlencoded`):
//!
//! ```text
//! pull:   key=<shared secret>&version=<current local version>
//! notify: key=<shared secret>
//! ```
//!
//! The pull endpoint answers with JSON:
//!
//! ```json
//! { "code": 2, "data": { "config": [ {"key": "timeout", "value": "30"} ], "version": "5" } }
//! ```
//!
//! `code == 2` means "a newer bundle is attached"; any other code means there
//! is nothing to apply.  The `Raw*` types mirror that JSON loosely (numbers
//! and strings are both accepted where the endpoint has been seen to send
//! either); [`crate::protocol::codec::decode_pull_response`] turns them into a
//! validated [`PullReply`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{store::ConfigEntry, version::ConfigVersion};

/// `code` value signalling that `data` carries a newer configuration.
pub const UPDATE_AVAILABLE: i64 = 2;

// ── Outbound ──────────────────────────────────────────────────────────────────

/// Form body of a pull request.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    /// Shared secret identifying this client.
    pub key: String,
    /// The version currently stored locally (`"0"` if never synced).
    pub version: String,
}

impl PullRequest {
    pub fn new(key: impl Into<String>, version: &ConfigVersion) -> Self {
        Self {
            key: key.into(),
            version: version.as_str().to_string(),
        }
    }
}

impl fmt::Debug for PullRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PullRequest")
            .field("key", &"<redacted>")
            .field("version", &self.version)
            .finish()
    }
}

/// Form body of a notify request.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NotifyRequest {
    /// Shared secret identifying this client.
    pub key: String,
}

impl NotifyRequest {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl fmt::Debug for NotifyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyRequest")
            .field("key", &"<redacted>")
            .finish()
    }
}

// ── Inbound (decoded) ─────────────────────────────────────────────────────────

/// A validated configuration bundle from a `code == 2` pull response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigUpdate {
    /// Entries in the order the endpoint sent them.
    pub entries: Vec<ConfigEntry>,
    /// The version the local store advances to.
    pub version: ConfigVersion,
}

/// What the pull endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullReply {
    /// Any `code` other than [`UPDATE_AVAILABLE`].
    NoUpdate { code: i64 },
    /// `code == 2` with a well-formed `data` object.
    Update(ConfigUpdate),
}

// ── Inbound (wire) ────────────────────────────────────────────────────────────

/// Top-level pull response as it appears on the wire.
///
/// `data` is kept as raw JSON so that its content is only inspected when
/// `code` says an update is attached.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPullResponse {
    pub code: Option<WireScalar>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// The `data` object of a `code == 2` response.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPullData {
    pub config: Vec<RawEntry>,
    pub version: WireScalar,
}

/// One element of `data.config`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEntry {
    pub key: String,
    #[serde(default)]
    pub value: Option<WireScalar>,
}

/// A JSON scalar that the endpoint may send as either a string or a number.
///
/// Numbers keep their `serde_json` representation so integers of any size up
/// to `u64::MAX` render back exactly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireScalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl WireScalar {
    /// Textual form as it will be stored.
    pub fn into_text(self) -> String {
        match self {
            WireScalar::Text(s) => s,
            WireScalar::Number(n) => n.to_string(),
            WireScalar::Bool(b) => b.to_string(),
        }
    }

    /// Integer value for `code`: a JSON integer, an integral float such as
    /// `2.0`, or a string holding an integer.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            WireScalar::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            WireScalar::Text(s) => s.trim().parse().ok(),
            WireScalar::Bool(_) => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_debug_redacts_secret() {
        // Arrange
        let req = PullRequest::new("s3cret", &ConfigVersion::new("4"));

        // Act
        let dbg = format!("{req:?}");

        // Assert
        assert!(!dbg.contains("s3cret"), "secret leaked: {dbg}");
        assert!(dbg.contains("\"4\""));
    }

    #[test]
    fn test_notify_request_debug_redacts_secret() {
        let dbg = format!("{:?}", NotifyRequest::new("s3cret"));
        assert!(!dbg.contains("s3cret"));
    }

    #[test]
    fn test_pull_request_serializes_key_then_version() {
        let req = PullRequest::new("abc", &ConfigVersion::initial());
        let json = serde_json::to_value(&req).expect("serialize");
        assert_eq!(json, serde_json::json!({"key": "abc", "version": "0"}));
    }

    #[test]
    fn test_wire_scalar_accepts_strings_and_numbers() {
        let text: WireScalar = serde_json::from_str("\"5\"").expect("string");
        let int: WireScalar = serde_json::from_str("5").expect("int");
        let float: WireScalar = serde_json::from_str("1.5").expect("float");

        assert_eq!(text.clone().into_text(), "5");
        assert_eq!(int.clone().into_text(), "5");
        assert_eq!(float.into_text(), "1.5");
        assert_eq!(text.as_code(), Some(5));
        assert_eq!(int.as_code(), Some(5));
    }

    #[test]
    fn test_wire_scalar_keeps_integers_beyond_i64_exact() {
        // Arrange
        let big: WireScalar = serde_json::from_str("12345678901234567890").expect("u64");

        // Act / Assert
        assert_eq!(big.clone().into_text(), "12345678901234567890");
        assert_eq!(big.as_code(), None);
    }

    #[test]
    fn test_wire_scalar_integral_float_is_a_code() {
        let two: WireScalar = serde_json::from_str("2.0").expect("float");
        let half: WireScalar = serde_json::from_str("2.5").expect("float");

        assert_eq!(two.as_code(), Some(2));
        assert_eq!(half.as_code(), None);
    }

    #[test]
    fn test_wire_scalar_bool_is_not_a_code() {
        let b: WireScalar = serde_json::from_str("true").expect("bool");
        assert_eq!(b.as_code(), None);
        assert_eq!(b.into_text(), "true");
    }
}
