//! Domain model for polled robot behaviors.
//!
//! Behaviors consume sensor events, emit velocity commands and navigation
//! goals, and report progress to the plan executor. Everything in this
//! module is free of I/O.

mod annotation;
mod camera;
mod error;
mod event;
mod geometry;
mod kind;
mod plan;
mod task;
mod waypoint;

pub use annotation::annotate_marker;
pub use camera::{CameraIntrinsics, MarkerCircle};
pub use error::{BehaviorError, ParseBehaviorKindError, PlanStepError};
pub use event::{BehaviorEvent, CameraFrame};
pub use geometry::{Detection, MarkerObservation, MarkerPosition, Point2, PoseSample, VelocityCommand};
pub use kind::BehaviorKind;
pub use plan::PlanStep;
pub use task::{BehaviorTask, Completion, TaskOutcome, require_arguments};
pub use waypoint::{WaypointEntry, WaypointTable};
