//! Align-to-marker behavior.
//!
//! Turns in place until the first detected marker is centred within the
//! configured tolerance. A timeout is an early exit, not a failure.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::{debug, info, warn};

use super::Inbox;
use crate::behavior::{
    domain::{
        BehaviorError, BehaviorEvent, BehaviorTask, Detection, TaskOutcome, VelocityCommand,
        require_arguments,
    },
    ports::VelocitySink,
};
use crate::config::AlignConfig;

const REQUIRED_ARGUMENTS: usize = 3;
const WAYPOINT_ARGUMENT: usize = 2;

/// Align behavior phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignPhase {
    /// No step in progress.
    Idle,
    /// Correcting heading from detections.
    Aligning,
    /// Centred; success is reported on the next tick.
    Aligned,
}

/// Centres the robot on the first detected marker.
pub struct AlignBehavior<C: Clock> {
    tolerance: f64,
    angular_speed: f64,
    timeout: Duration,
    tick_period: Duration,
    clock: Arc<C>,
    velocity: Arc<dyn VelocitySink>,
    inbox: Inbox,
    phase: AlignPhase,
    task: Option<BehaviorTask>,
}

impl<C: Clock> AlignBehavior<C> {
    /// Creates an idle align behavior.
    #[must_use]
    pub fn new(
        config: &AlignConfig,
        clock: Arc<C>,
        velocity: Arc<dyn VelocitySink>,
        inbox: Inbox,
    ) -> Self {
        Self {
            tolerance: config.tolerance,
            angular_speed: config.angular_speed,
            timeout: config.timeout(),
            tick_period: config.tick_period(),
            clock,
            velocity,
            inbox,
            phase: AlignPhase::Idle,
            task: None,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> AlignPhase {
        self.phase
    }

    /// Returns the tick period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Advances the behavior by one tick.
    pub fn tick(&mut self, arguments: &[String]) -> TaskOutcome {
        if self.phase == AlignPhase::Idle {
            if let Err(err) = self.start(arguments) {
                warn!(error = %err, "align step rejected");
                return TaskOutcome::from_error(&err);
            }
        }

        if self.phase == AlignPhase::Aligned {
            self.finish();
            info!("aligned with marker");
            return TaskOutcome::succeeded("Aligned with marker");
        }

        for event in self.inbox.drain() {
            if let BehaviorEvent::Detection(detection) = event {
                self.on_detection(&detection);
            }
        }

        let Some(task) = self.task.as_mut() else {
            return TaskOutcome::Pending;
        };
        if task.is_expired(self.clock.as_ref(), self.timeout) {
            self.finish();
            let err = BehaviorError::Timeout {
                activity: "alignment",
                after: self.timeout,
            };
            warn!(error = %err, "giving up on alignment");
            return TaskOutcome::succeeded("Alignment timeout");
        }

        let progress = task.track_elapsed(self.clock.as_ref(), self.timeout);
        TaskOutcome::running(progress, "Aligning with marker...")
    }

    fn start(&mut self, arguments: &[String]) -> Result<(), BehaviorError> {
        require_arguments(arguments, REQUIRED_ARGUMENTS)?;
        let stale = self.inbox.drain().len();
        let task = BehaviorTask::start(arguments, self.clock.as_ref());
        info!(
            waypoint = task.argument(WAYPOINT_ARGUMENT).unwrap_or_default(),
            discarded_events = stale,
            "aligning with marker"
        );
        self.task = Some(task);
        self.phase = AlignPhase::Aligning;
        Ok(())
    }

    fn on_detection(&mut self, detection: &Detection) {
        if self.phase != AlignPhase::Aligning {
            return;
        }
        let Some(marker) = detection.first() else {
            return;
        };
        let offset = marker.position.x;
        if offset.abs() <= self.tolerance {
            debug!(marker_id = %marker.id, offset, "marker centred");
            self.phase = AlignPhase::Aligned;
            self.velocity.publish(VelocityCommand::stop());
        } else {
            let angular_z = -offset.signum() * self.angular_speed;
            debug!(marker_id = %marker.id, offset, angular_z, "correcting heading");
            self.velocity.publish(VelocityCommand::rotate(angular_z));
        }
    }

    fn finish(&mut self) {
        self.velocity.publish(VelocityCommand::stop());
        if let Some(task) = self.task.as_mut() {
            task.complete();
        }
        self.task = None;
        self.phase = AlignPhase::Idle;
    }
}
