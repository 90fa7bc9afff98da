//! Photograph-marker behavior.
//!
//! Pairs the latest detection with the next camera frame, annotates the
//! frame and stores it under the marker id. A timeout is an early exit, not
//! a failure.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::{debug, info, warn};

use super::Inbox;
use crate::behavior::{
    domain::{
        BehaviorError, BehaviorEvent, BehaviorTask, CameraFrame, CameraIntrinsics,
        MarkerObservation, TaskOutcome, annotate_marker, require_arguments,
    },
    ports::PhotoStore,
};
use crate::config::PhotographConfig;

const REQUIRED_ARGUMENTS: usize = 4;
const MARKER_ARGUMENT: usize = 2;

/// Photograph behavior phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotographPhase {
    /// No step in progress.
    Idle,
    /// Waiting for a frame that shows the detected marker.
    WaitingForFrame,
    /// The photo was written; success is reported on the next tick.
    Saved,
}

/// Takes one annotated photograph of the currently detected marker.
pub struct PhotographBehavior<C: Clock> {
    timeout: Duration,
    tick_period: Duration,
    intrinsics: CameraIntrinsics,
    marker_size: f64,
    clock: Arc<C>,
    store: Arc<dyn PhotoStore>,
    inbox: Inbox,
    phase: PhotographPhase,
    task: Option<BehaviorTask>,
    latest: Option<MarkerObservation>,
}

impl<C: Clock> PhotographBehavior<C> {
    /// Creates an idle photograph behavior.
    #[must_use]
    pub fn new(
        config: &PhotographConfig,
        clock: Arc<C>,
        store: Arc<dyn PhotoStore>,
        inbox: Inbox,
    ) -> Self {
        Self {
            timeout: config.timeout(),
            tick_period: config.tick_period(),
            intrinsics: config.intrinsics,
            marker_size: config.marker_size,
            clock,
            store,
            inbox,
            phase: PhotographPhase::Idle,
            task: None,
            latest: None,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> PhotographPhase {
        self.phase
    }

    /// Returns the tick period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Advances the behavior by one tick.
    pub fn tick(&mut self, arguments: &[String]) -> TaskOutcome {
        if self.phase == PhotographPhase::Idle {
            if let Err(err) = self.start(arguments) {
                warn!(error = %err, "photograph step rejected");
                return TaskOutcome::from_error(&err);
            }
        }

        if self.phase == PhotographPhase::Saved {
            self.reset();
            return TaskOutcome::succeeded("Photo saved");
        }

        for event in self.inbox.drain() {
            match event {
                BehaviorEvent::Detection(detection) => {
                    if let Some(marker) = detection.first() {
                        self.latest = Some(*marker);
                    }
                }
                BehaviorEvent::Frame(frame) => {
                    if self.phase == PhotographPhase::WaitingForFrame {
                        self.on_frame(&frame);
                    }
                }
                BehaviorEvent::Odometry(_) | BehaviorEvent::Markers(_) => {}
            }
        }

        let Some(task) = self.task.as_mut() else {
            return TaskOutcome::Pending;
        };
        if self.phase == PhotographPhase::WaitingForFrame
            && task.is_expired(self.clock.as_ref(), self.timeout)
        {
            self.reset();
            let err = BehaviorError::Timeout {
                activity: "photograph",
                after: self.timeout,
            };
            warn!(error = %err, "no photograph taken");
            return TaskOutcome::succeeded("Photo timeout");
        }

        let progress = task.track_elapsed(self.clock.as_ref(), self.timeout);
        TaskOutcome::running(progress, "Taking photo...")
    }

    fn start(&mut self, arguments: &[String]) -> Result<(), BehaviorError> {
        require_arguments(arguments, REQUIRED_ARGUMENTS)?;
        for event in self.inbox.drain() {
            if let BehaviorEvent::Detection(detection) = event {
                if let Some(marker) = detection.first() {
                    self.latest = Some(*marker);
                }
            }
        }
        let task = BehaviorTask::start(arguments, self.clock.as_ref());
        info!(
            marker = task.argument(MARKER_ARGUMENT).unwrap_or_default(),
            "waiting for a frame to photograph"
        );
        self.task = Some(task);
        self.phase = PhotographPhase::WaitingForFrame;
        Ok(())
    }

    fn on_frame(&mut self, frame: &CameraFrame) {
        let Some(marker) = self.latest else {
            debug!("frame ignored; no marker detected yet");
            return;
        };
        let Some(circle) = self.intrinsics.project_marker(marker.position, self.marker_size)
        else {
            debug!(marker_id = %marker.id, "marker behind the camera; frame skipped");
            return;
        };
        if !circle.is_inside(frame.image().width(), frame.image().height()) {
            debug!(
                marker_id = %marker.id,
                u = circle.center_u,
                v = circle.center_v,
                "marker centre outside the frame; frame skipped"
            );
            return;
        }

        let mut annotated = frame.to_image();
        annotate_marker(&mut annotated, circle, marker.id);
        match self.store.save(marker.id, &annotated) {
            Ok(name) => {
                info!(marker_id = %marker.id, photo = %name, "photo saved");
                self.phase = PhotographPhase::Saved;
            }
            Err(err) => warn!(marker_id = %marker.id, error = %err, "failed to save photo"),
        }
    }

    fn reset(&mut self) {
        self.task = None;
        self.phase = PhotographPhase::Idle;
    }
}
