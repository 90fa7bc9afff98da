//! Planar poses, marker observations, and velocity commands.

use crate::registry::domain::MarkerId;
use serde::{Deserialize, Serialize};

/// A point in the map frame, in metres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2 {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Latest robot position reported by odometry.
pub type PoseSample = Point2;

/// Marker position in the camera optical frame, in metres.
///
/// `x` grows to the right of the image centre, `y` downwards and `z` away
/// from the lens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    /// Lateral offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
    /// Depth.
    pub z: f64,
}

impl MarkerPosition {
    /// Creates a marker position.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One marker reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerObservation {
    /// Detected marker id.
    pub id: MarkerId,
    /// Estimated position in the camera frame.
    pub position: MarkerPosition,
}

impl MarkerObservation {
    /// Creates an observation.
    #[must_use]
    pub const fn new(id: MarkerId, position: MarkerPosition) -> Self {
        Self { id, position }
    }
}

/// One detector message: every marker visible in a frame.
///
/// Behaviors only ever consume the first entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    markers: Vec<MarkerObservation>,
}

impl Detection {
    /// Creates a detection message.
    #[must_use]
    pub fn new(markers: impl IntoIterator<Item = MarkerObservation>) -> Self {
        Self {
            markers: markers.into_iter().collect(),
        }
    }

    /// A message carrying a single marker.
    #[must_use]
    pub fn single(id: MarkerId, position: MarkerPosition) -> Self {
        Self::new([MarkerObservation::new(id, position)])
    }

    /// Returns the first reported marker.
    #[must_use]
    pub fn first(&self) -> Option<&MarkerObservation> {
        self.markers.first()
    }

    /// Returns `true` when no marker is reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Planar velocity command for the base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityCommand {
    /// Forward speed in m/s.
    pub linear_x: f64,
    /// Yaw rate in rad/s, positive counter-clockwise.
    pub angular_z: f64,
}

impl VelocityCommand {
    /// The all-zero command.
    #[must_use]
    pub const fn stop() -> Self {
        Self {
            linear_x: 0.0,
            angular_z: 0.0,
        }
    }

    /// Rotation in place at `angular_z` rad/s.
    #[must_use]
    pub const fn rotate(angular_z: f64) -> Self {
        Self {
            linear_x: 0.0,
            angular_z,
        }
    }

    /// Returns `true` for the all-zero command.
    #[must_use]
    pub fn is_stop(self) -> bool {
        self.linear_x == 0.0 && self.angular_z == 0.0
    }
}
