//! Single-owner in-memory marker store.
//!
//! The store performs no locking. It is owned by the registry service loop,
//! which serializes every mutation and read.

use std::collections::BTreeMap;

use crate::registry::domain::{
    MarkerId, MarkerRecord, RegistryLookupError, RegistrySnapshot, WaypointName,
};

/// Keyed marker store with latest-write-wins upserts.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    records: BTreeMap<MarkerId, MarkerRecord>,
}

impl MarkerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the record for `id` and returns the stored waypoint.
    pub fn add(&mut self, id: MarkerId, waypoint: WaypointName) -> WaypointName {
        let record = MarkerRecord::new(id, waypoint.clone());
        if let Some(previous) = self.records.insert(id, record) {
            tracing::debug!(
                marker_id = %id,
                previous = %previous.origin_waypoint(),
                "replaced marker record"
            );
        }
        waypoint
    }

    /// Returns the origin waypoint of the `n`-th lowest id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryLookupError`] when the store is empty or `n` is out
    /// of range.
    pub fn nth(&self, n: i64) -> Result<WaypointName, RegistryLookupError> {
        if self.records.is_empty() {
            return Err(RegistryLookupError::EmptyRegistry);
        }
        let out_of_range = RegistryLookupError::IndexOutOfRange {
            index: n,
            count: self.records.len(),
        };
        let index = usize::try_from(n).map_err(|_| out_of_range)?;
        self.records
            .values()
            .nth(index)
            .map(|record| record.origin_waypoint().clone())
            .ok_or(out_of_range)
    }

    /// Builds the ascending-id snapshot of every record.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::from_records(self.records.values().cloned())
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no record is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
