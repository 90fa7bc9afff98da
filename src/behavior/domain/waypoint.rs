//! Static waypoint name to map coordinate table.

use super::{BehaviorError, Point2};
use serde::{Deserialize, Serialize};

/// One named tour waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointEntry {
    /// Waypoint name used in plans.
    pub name: String,
    /// X coordinate in the map frame.
    pub x: f64,
    /// Y coordinate in the map frame.
    pub y: f64,
}

impl WaypointEntry {
    /// Creates a waypoint entry.
    #[must_use]
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }
}

/// Ordered waypoint table; its length is the fixed tour length.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointTable {
    entries: Vec<WaypointEntry>,
}

impl WaypointTable {
    /// Creates a table from entries, keeping their order.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = WaypointEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The four corner waypoints of the exploration arena.
    #[must_use]
    pub fn default_tour() -> Self {
        Self::new([
            WaypointEntry::new("wp1", -6.0, -6.0),
            WaypointEntry::new("wp2", -6.0, 6.0),
            WaypointEntry::new("wp3", 6.0, 6.0),
            WaypointEntry::new("wp4", 6.0, -6.0),
        ])
    }

    /// Resolves a waypoint name to its coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`BehaviorError::UnknownWaypoint`] when the name is absent.
    pub fn resolve(&self, name: &str) -> Result<Point2, BehaviorError> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| Point2::new(entry.x, entry.y))
            .ok_or_else(|| BehaviorError::UnknownWaypoint(name.to_owned()))
    }

    /// Returns the number of waypoints in the tour.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the table has no waypoint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in tour order.
    #[must_use]
    pub fn entries(&self) -> &[WaypointEntry] {
        &self.entries
    }
}

impl Default for WaypointTable {
    fn default() -> Self {
        Self::default_tour()
    }
}
