//! Pinhole projection of a detected marker into image coordinates.

use super::MarkerPosition;
use serde::{Deserialize, Serialize};

/// Pinhole camera intrinsics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraIntrinsics {
    /// Focal length in x (pixels).
    pub fx: f64,
    /// Focal length in y (pixels).
    pub fy: f64,
    /// Principal point x (pixels).
    pub cx: f64,
    /// Principal point y (pixels).
    pub cy: f64,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            fx: 381.361_160_278_320_3,
            fy: 381.361_160_278_320_3,
            cx: 320.0,
            cy: 240.0,
        }
    }
}

impl CameraIntrinsics {
    /// Projects a camera-frame point to pixel coordinates, truncated
    /// toward zero.
    ///
    /// Returns `None` for points at or behind the image plane.
    #[must_use]
    pub fn project(self, x: f64, y: f64, z: f64) -> Option<(i64, i64)> {
        if z <= 0.0 {
            return None;
        }
        Some((
            truncate(self.fx * x / z + self.cx),
            truncate(self.fy * y / z + self.cy),
        ))
    }

    /// Projects a square marker of side `marker_size` centred at `position`
    /// to its bounding circle.
    ///
    /// The radius is the largest pixel distance from the projected centre to
    /// a projected corner. Coordinates saturate at the `i64` range for
    /// markers very close to the image plane. Returns `None` when the marker is not in front of
    /// the camera.
    #[must_use]
    pub fn project_marker(self, position: MarkerPosition, marker_size: f64) -> Option<MarkerCircle> {
        let (center_u, center_v) = self.project(position.x, position.y, position.z)?;
        let half = marker_size / 2.0;
        let corners = [(-half, -half), (half, -half), (half, half), (-half, half)];

        let mut radius = 0;
        for (dx, dy) in corners {
            let corner = self.project(position.x + dx, position.y + dy, position.z)?;
            radius = radius.max(pixel_distance((center_u, center_v), corner));
        }

        Some(MarkerCircle {
            center_u,
            center_v,
            radius,
        })
    }
}

/// Projected marker outline in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerCircle {
    /// Column of the projected centre.
    pub center_u: i64,
    /// Row of the projected centre.
    pub center_v: i64,
    /// Radius in pixels.
    pub radius: i64,
}

impl MarkerCircle {
    /// Returns `true` when the centre lies inside a `width` x `height` image.
    #[must_use]
    pub fn is_inside(self, width: u32, height: u32) -> bool {
        (0..i64::from(width)).contains(&self.center_u)
            && (0..i64::from(height)).contains(&self.center_v)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel coordinates are truncated toward zero by definition"
)]
fn truncate(value: f64) -> i64 {
    value as i64
}

#[expect(
    clippy::cast_precision_loss,
    reason = "saturated coordinates only need an approximate distance"
)]
fn pixel_distance(from: (i64, i64), to: (i64, i64)) -> i64 {
    let du = to.0 as f64 - from.0 as f64;
    let dv = to.1 as f64 - from.1 as f64;
    truncate(du.hypot(dv))
}
