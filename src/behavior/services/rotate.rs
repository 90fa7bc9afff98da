//! Rotate-and-detect behavior.
//!
//! Spins in place until a marker is seen, then registers the first marker
//! of the sweep against the waypoint the robot is standing on.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::{debug, info, warn};

use super::Inbox;
use crate::behavior::{
    domain::{
        BehaviorError, BehaviorEvent, BehaviorTask, Detection, PoseSample, TaskOutcome,
        VelocityCommand, require_arguments,
    },
    ports::VelocitySink,
};
use crate::config::RotateConfig;
use crate::registry::{
    domain::{MarkerId, WaypointName},
    ports::MarkerRegistry,
};

const REQUIRED_ARGUMENTS: usize = 3;
const ORIGIN_ARGUMENT: usize = 1;
const MARKER_ARGUMENT: usize = 2;

/// Rotate-and-detect phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatePhase {
    /// No sweep in progress.
    Idle,
    /// Turning and watching detections.
    Rotating,
    /// A marker was captured; registration happens on the next tick.
    Detected,
}

/// The first marker captured in a sweep and where the robot stood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSighting {
    /// Captured marker id.
    pub id: MarkerId,
    /// Robot position when the marker was seen.
    pub pose: PoseSample,
}

/// Sweeps for a marker and records it in the marker registry.
pub struct RotateAndDetectBehavior<C: Clock> {
    angular_speed: f64,
    timeout: Duration,
    tick_period: Duration,
    registry_wait: Duration,
    clock: Arc<C>,
    velocity: Arc<dyn VelocitySink>,
    registry: Arc<dyn MarkerRegistry>,
    inbox: Inbox,
    phase: RotatePhase,
    task: Option<BehaviorTask>,
    pose: PoseSample,
    sighting: Option<MarkerSighting>,
}

impl<C: Clock> RotateAndDetectBehavior<C> {
    /// Creates an idle rotate-and-detect behavior.
    #[must_use]
    pub fn new(
        config: &RotateConfig,
        clock: Arc<C>,
        velocity: Arc<dyn VelocitySink>,
        registry: Arc<dyn MarkerRegistry>,
        inbox: Inbox,
    ) -> Self {
        Self {
            angular_speed: config.angular_speed,
            timeout: config.timeout(),
            tick_period: config.tick_period(),
            registry_wait: config.registry_wait(),
            clock,
            velocity,
            registry,
            inbox,
            phase: RotatePhase::Idle,
            task: None,
            pose: PoseSample::default(),
            sighting: None,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> RotatePhase {
        self.phase
    }

    /// Returns the marker captured by the most recent successful sweep.
    #[must_use]
    pub const fn last_sighting(&self) -> Option<MarkerSighting> {
        self.sighting
    }

    /// Returns the tick period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Advances the behavior by one tick.
    pub async fn tick(&mut self, arguments: &[String]) -> TaskOutcome {
        if self.phase == RotatePhase::Idle {
            if let Err(err) = self.start(arguments) {
                warn!(error = %err, "rotate-and-detect step rejected");
                return TaskOutcome::from_error(&err);
            }
        }

        if self.phase == RotatePhase::Detected {
            return self.register_and_finish().await;
        }

        for event in self.inbox.drain() {
            match event {
                BehaviorEvent::Odometry(pose) => self.pose = pose,
                BehaviorEvent::Detection(detection) => self.on_detection(&detection),
                BehaviorEvent::Frame(_) | BehaviorEvent::Markers(_) => {}
            }
        }

        let Some(task) = self.task.as_mut() else {
            return TaskOutcome::Pending;
        };
        if task.is_expired(self.clock.as_ref(), self.timeout) {
            self.reset();
            let err = BehaviorError::Timeout {
                activity: "marker detection",
                after: self.timeout,
            };
            warn!(error = %err, "no marker seen during sweep");
            return TaskOutcome::failed("Marker not detected");
        }

        let progress = task.track_elapsed(self.clock.as_ref(), self.timeout);
        TaskOutcome::running(progress, "Rotating to detect marker...")
    }

    fn start(&mut self, arguments: &[String]) -> Result<(), BehaviorError> {
        require_arguments(arguments, REQUIRED_ARGUMENTS)?;
        for event in self.inbox.drain() {
            if let BehaviorEvent::Odometry(pose) = event {
                self.pose = pose;
            }
        }
        let task = BehaviorTask::start(arguments, self.clock.as_ref());
        info!(
            origin = task.argument(ORIGIN_ARGUMENT).unwrap_or_default(),
            marker = task.argument(MARKER_ARGUMENT).unwrap_or_default(),
            "rotating to detect marker"
        );
        self.task = Some(task);
        self.sighting = None;
        self.phase = RotatePhase::Rotating;
        self.velocity.publish(VelocityCommand::rotate(self.angular_speed));
        Ok(())
    }

    fn on_detection(&mut self, detection: &Detection) {
        if self.phase != RotatePhase::Rotating {
            return;
        }
        let Some(marker) = detection.first() else {
            return;
        };
        info!(marker_id = %marker.id, x = self.pose.x, y = self.pose.y, "marker detected");
        self.sighting = Some(MarkerSighting {
            id: marker.id,
            pose: self.pose,
        });
        self.phase = RotatePhase::Detected;
        self.velocity.publish(VelocityCommand::stop());
    }

    async fn register_and_finish(&mut self) -> TaskOutcome {
        let origin = self
            .task
            .as_ref()
            .and_then(|task| task.argument(ORIGIN_ARGUMENT))
            .map(str::to_owned);
        if let (Some(sighting), Some(origin)) = (self.sighting, origin) {
            self.register(sighting.id, origin).await;
        }
        self.reset();
        TaskOutcome::succeeded("Marker detected")
    }

    async fn register(&self, id: MarkerId, origin: String) {
        let waypoint = match WaypointName::new(origin) {
            Ok(waypoint) => waypoint,
            Err(err) => {
                warn!(marker_id = %id, error = %err, "marker not registered");
                return;
            }
        };
        if !self.registry.wait_until_ready(self.registry_wait).await {
            warn!(marker_id = %id, "marker registry unavailable; marker not registered");
            return;
        }
        match self.registry.submit_marker(id, waypoint.clone()) {
            Ok(()) => debug!(marker_id = %id, waypoint = %waypoint, "submitted marker"),
            Err(err) => warn!(marker_id = %id, error = %err, "marker not registered"),
        }
    }

    fn reset(&mut self) {
        self.velocity.publish(VelocityCommand::stop());
        self.task = None;
        self.phase = RotatePhase::Idle;
    }
}
