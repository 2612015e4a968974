//! Configuration version identifiers.
//!
//! Versions travel as strings (the pull endpoint may send either `"5"` or
//! `5`) and are stored verbatim.  Two versions are considered the same when
//! both parse as integers and the integers are equal, or otherwise when the
//! strings are identical.  So `"05"` matches `"5"`, but `"v5"` only matches
//! `"v5"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::store::{has_line_break, StoreError};

/// A configuration version as stored in the reserved `version` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigVersion(String);

impl ConfigVersion {
    /// The version reported by a client that has never synced.
    pub const INITIAL: &'static str = "0";

    /// Wraps a version string without any normalisation.
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// The version of an absent store.
    pub fn initial() -> Self {
        Self(Self::INITIAL.to_string())
    }

    /// Returns the version exactly as it was received or stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value of the version, if it has one.
    pub fn as_integer(&self) -> Option<i128> {
        self.0.trim().parse().ok()
    }

    /// Checks that the version can be written as the `version` entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidVersion`] for a blank version or one
    /// containing a line break.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.0.trim().is_empty() || has_line_break(&self.0) {
            return Err(StoreError::InvalidVersion(self.0.clone()));
        }
        Ok(())
    }

    /// Returns `true` when `other` names the same version.
    ///
    /// Numeric comparison when both sides parse as integers, exact string
    /// equality otherwise.
    pub fn matches(&self, other: &str) -> bool {
        match (self.as_integer(), other.trim().parse::<i128>().ok()) {
            (Some(a), Some(b)) => a == b,
            _ => self.0 == other,
        }
    }
}

impl Default for ConfigVersion {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConfigVersion {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ConfigVersion {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_version_is_zero() {
        assert_eq!(ConfigVersion::initial().as_str(), "0");
        assert_eq!(ConfigVersion::default(), ConfigVersion::initial());
    }

    #[test]
    fn test_matches_compares_integers_numerically() {
        // Arrange
        let v = ConfigVersion::new("5");

        // Act / Assert
        assert!(v.matches("5"));
        assert!(v.matches("05"));
        assert!(v.matches(" 5 "));
        assert!(!v.matches("6"));
    }

    #[test]
    fn test_matches_falls_back_to_string_equality_for_non_integers() {
        let v = ConfigVersion::new("2024-01-release");
        assert!(v.matches("2024-01-release"));
        assert!(!v.matches("2024-01-RELEASE"));
    }

    #[test]
    fn test_matches_mixed_integer_and_text_is_false() {
        let v = ConfigVersion::new("5");
        assert!(!v.matches("v5"));
    }

    #[test]
    fn test_validate_rejects_blank_and_multiline_versions() {
        assert!(ConfigVersion::new("5").validate().is_ok());
        assert!(ConfigVersion::new("").validate().is_err());
        assert!(ConfigVersion::new("5\nx=1").validate().is_err());
    }

    #[test]
    fn test_display_keeps_original_text() {
        let v = ConfigVersion::new("007");
        assert_eq!(v.to_string(), "007");
        assert_eq!(v.as_integer(), Some(7));
    }
}
