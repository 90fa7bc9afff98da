//! Marker records and the id-sorted registry snapshot.

use std::collections::BTreeMap;

use super::{MarkerId, RegistryLookupError, WaypointName};
use serde::{Deserialize, Serialize};

/// A discovered landmark and the waypoint it was discovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRecord {
    id: MarkerId,
    origin_waypoint: WaypointName,
}

impl MarkerRecord {
    /// Creates a marker record.
    #[must_use]
    pub const fn new(id: MarkerId, origin_waypoint: WaypointName) -> Self {
        Self {
            id,
            origin_waypoint,
        }
    }

    /// Returns the marker identifier.
    #[must_use]
    pub const fn id(&self) -> MarkerId {
        self.id
    }

    /// Returns the waypoint the marker was discovered from.
    #[must_use]
    pub const fn origin_waypoint(&self) -> &WaypointName {
        &self.origin_waypoint
    }
}

/// Records ordered by ascending marker id.
///
/// Snapshots are rebuilt from the live store on every lookup and broadcast
/// and are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrySnapshot(Vec<MarkerRecord>);

impl RegistrySnapshot {
    /// Builds a snapshot, sorting records by ascending id.
    ///
    /// When the input repeats an id, the last occurrence wins.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = MarkerRecord>) -> Self {
        let keyed: BTreeMap<MarkerId, MarkerRecord> = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self(keyed.into_values().collect())
    }

    /// Returns the number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when no record is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the record at zero-based position `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MarkerRecord> {
        self.0.get(index)
    }

    /// Returns the record with the `n`-th lowest id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryLookupError::EmptyRegistry`] when the snapshot holds
    /// no record and [`RegistryLookupError::IndexOutOfRange`] when `n` is
    /// negative or not below the record count.
    pub fn nth(&self, n: i64) -> Result<&MarkerRecord, RegistryLookupError> {
        if self.0.is_empty() {
            return Err(RegistryLookupError::EmptyRegistry);
        }
        let out_of_range = RegistryLookupError::IndexOutOfRange {
            index: n,
            count: self.0.len(),
        };
        let index = usize::try_from(n).map_err(|_| out_of_range)?;
        self.0.get(index).ok_or(out_of_range)
    }

    /// Iterates over records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &MarkerRecord> {
        self.0.iter()
    }

    /// Returns the records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[MarkerRecord] {
        &self.0
    }
}
