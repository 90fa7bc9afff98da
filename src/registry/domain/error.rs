//! Error types for registry value validation and lookups.

use thiserror::Error;

/// Errors returned while constructing registry values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryDomainError {
    /// The waypoint name is empty or contains whitespace.
    #[error("invalid waypoint name '{0}'")]
    InvalidWaypointName(String),
}

/// Errors returned by nth-marker lookups.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RegistryLookupError {
    /// No marker has been registered yet.
    #[error("no markers registered")]
    EmptyRegistry,

    /// The requested rank is negative or beyond the registered count.
    #[error("marker index {index} out of range, registry holds {count} markers")]
    IndexOutOfRange {
        /// Requested zero-based rank.
        index: i64,
        /// Number of registered markers.
        count: usize,
    },
}
