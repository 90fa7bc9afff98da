//! Out-of-band inputs delivered to a behavior's inbox.

use super::{Detection, PoseSample};
use crate::registry::domain::RegistrySnapshot;
use image::RgbImage;
use std::sync::Arc;

/// A raw camera frame, shared cheaply between subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame(Arc<RgbImage>);

impl CameraFrame {
    /// Wraps a decoded frame.
    #[must_use]
    pub fn new(image: RgbImage) -> Self {
        Self(Arc::new(image))
    }

    /// Returns the frame pixels.
    #[must_use]
    pub fn image(&self) -> &RgbImage {
        &self.0
    }

    /// Returns an owned copy for annotation.
    #[must_use]
    pub fn to_image(&self) -> RgbImage {
        self.0.as_ref().clone()
    }
}

/// Sensor or registry input queued for a behavior between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorEvent {
    /// Marker detector output.
    Detection(Detection),
    /// Latest odometry position.
    Odometry(PoseSample),
    /// Raw camera frame.
    Frame(CameraFrame),
    /// Periodic registry broadcast.
    Markers(RegistrySnapshot),
}
