//! Identifier and validated scalar types for the registry domain.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric fiducial marker identifier as reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(i64);

impl MarkerId {
    /// Creates a marker identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for MarkerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Symbolic waypoint name such as `wp3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WaypointName(String);

impl WaypointName {
    /// Creates a validated waypoint name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidWaypointName`] when the trimmed
    /// value is empty or contains interior whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(RegistryDomainError::InvalidWaypointName(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the waypoint name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WaypointName {
    type Error = RegistryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WaypointName> for String {
    fn from(value: WaypointName) -> Self {
        value.0
    }
}

impl AsRef<str> for WaypointName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for WaypointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
