//! Behavior kinds dispatched by the plan executor.

use super::ParseBehaviorKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action type handled by one behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    /// Centre the closest visible marker in the camera frame.
    Align,
    /// Navigate to a tour waypoint or a registry-drawn destination.
    Move,
    /// Spin in place until a marker is seen, then register it.
    RotateAndDetect,
    /// Save an annotated camera frame of the visible marker.
    Photograph,
    /// Close the detection phase.
    FinishDetection,
}

impl BehaviorKind {
    /// Every kind, in dispatch-table order.
    pub const ALL: [Self; 5] = [
        Self::Align,
        Self::Move,
        Self::RotateAndDetect,
        Self::Photograph,
        Self::FinishDetection,
    ];

    /// Returns the action name used in plans.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Align => "align",
            Self::Move => "move",
            Self::RotateAndDetect => "rotateanddetect",
            Self::Photograph => "photographmarker",
            Self::FinishDetection => "finishdetection",
        }
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BehaviorKind {
    type Error = ParseBehaviorKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "align" => Ok(Self::Align),
            "move" | "explore" => Ok(Self::Move),
            "rotateanddetect" => Ok(Self::RotateAndDetect),
            "photographmarker" | "photograph" => Ok(Self::Photograph),
            "finishdetection" => Ok(Self::FinishDetection),
            _ => Err(ParseBehaviorKindError(value.to_owned())),
        }
    }
}
