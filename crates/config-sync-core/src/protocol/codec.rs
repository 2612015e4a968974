//! Decoder for pull responses.
//!
//! The endpoint's reply is classified in three steps:
//!
//! 1. The body must be a JSON object with a `code` field.
//! 2. Any `code` other than `2` is a [`PullReply::NoUpdate`]; `data` is not
//!    looked at, whatever it contains.
//! 3. For `code == 2`, `data.config` and `data.version` must be present and
//!    every entry must be storable (see [`ConfigEntry::validate`]).  A bundle
//!    that fails here is rejected as a whole, before anything is notified or
//!    written.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{
    store::{ConfigEntry, StoreError},
    version::ConfigVersion,
};
use crate::protocol::messages::{
    ConfigUpdate, PullReply, RawPullData, RawPullResponse, UPDATE_AVAILABLE,
};

/// Errors that can occur while decoding a pull response.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(String),

    /// The body is valid JSON but not an object.
    #[error("response body is not a JSON object")]
    NotAnObject,

    /// The object has no `code` field.
    #[error("response has no `code` field")]
    MissingCode,

    /// `code` is present but is not an integer.
    #[error("response `code` is not an integer: {0}")]
    InvalidCode(String),

    /// `code == 2` but `data` is absent or null.
    #[error("update signalled but response has no `data`")]
    MissingData,

    /// `data` does not have the `config` list and `version` field.
    #[error("malformed `data` object: {0}")]
    MalformedData(String),

    /// An entry or the version cannot be stored.
    #[error("unstorable update: {0}")]
    InvalidEntry(#[from] StoreError),
}

/// Decodes the body of a pull response.
///
/// # Errors
///
/// Returns [`ProtocolError`] when the body is not JSON, carries no usable
/// `code`, or signals an update whose `data` is missing or unstorable.
///
/// # Examples
///
/// ```rust
/// use config_sync_core::{decode_pull_response, PullReply};
///
/// let reply = decode_pull_response(r#"{"code":1}"#).unwrap();
/// assert_eq!(reply, PullReply::NoUpdate { code: 1 });
/// ```
pub fn decode_pull_response(body: &str) -> Result<PullReply, ProtocolError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;
    if !value.is_object() {
        return Err(ProtocolError::NotAnObject);
    }
    let raw = RawPullResponse::deserialize(value)
        .map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;

    let code_field = raw.code.ok_or(ProtocolError::MissingCode)?;
    let code = code_field
        .as_code()
        .ok_or_else(|| ProtocolError::InvalidCode(code_field.into_text()))?;

    if code != UPDATE_AVAILABLE {
        return Ok(PullReply::NoUpdate { code });
    }

    let data = match raw.data {
        Some(serde_json::Value::Null) | None => return Err(ProtocolError::MissingData),
        Some(value) if value.is_object() => value,
        Some(_) => {
            return Err(ProtocolError::MalformedData(
                "`data` is not an object".to_string(),
            ))
        }
    };
    let data = RawPullData::deserialize(data)
        .map_err(|e| ProtocolError::MalformedData(e.to_string()))?;

    let version = ConfigVersion::new(data.version.into_text());
    version.validate()?;

    let entries = data
        .config
        .into_iter()
        .map(|raw| {
            let value = raw.value.map(|v| v.into_text()).unwrap_or_default();
            let entry = ConfigEntry::new(raw.key, value);
            entry.validate().map(|()| entry)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PullReply::Update(ConfigUpdate { entries, version }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
