//! Kinematic stand-in robot for running plans without hardware.
//!
//! The robot drives straight to navigation goals, publishes odometry while
//! moving, and reports a marker (detection plus camera frame) whenever it
//! stands close to one of the placed markers. The marker's lateral offset in
//! the camera follows the commanded yaw rate, so alignment converges.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::behavior::{
    domain::{
        BehaviorEvent, CameraFrame, Detection, MarkerPosition, Point2, VelocityCommand,
    },
    ports::{
        GoalReceipt, NavigationClient, NavigationGoal, NavigationOutcome, NavigationResult,
        VelocitySink,
    },
    services::EventFanout,
};
use crate::registry::domain::MarkerId;

const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;
const VISIBILITY_RADIUS: f64 = 0.5;
const ARRIVAL_OFFSET: f64 = 0.2;
const MAX_OFFSET: f64 = 0.5;
const MARKER_DEPTH: f64 = 1.0;

/// A marker placed in the simulated arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedMarker {
    /// Marker id reported by the detector.
    pub id: MarkerId,
    /// Map position the marker is visible from.
    pub location: Point2,
}

impl PlacedMarker {
    /// Places marker `id` at `location`.
    #[must_use]
    pub const fn new(id: MarkerId, location: Point2) -> Self {
        Self { id, location }
    }
}

#[derive(Debug, Default)]
struct Kinematics {
    pose: Point2,
    angular_z: f64,
    lateral_offset: f64,
}

#[derive(Debug)]
struct SimulationState {
    kinematics: Mutex<Kinematics>,
    markers: Vec<PlacedMarker>,
    odometry: EventFanout,
    camera: EventFanout,
    speed: f64,
    step: Duration,
    blank_frame: CameraFrame,
}

/// Simulated robot implementing the navigation and velocity ports.
#[derive(Debug, Clone)]
pub struct SimulatedRobot {
    state: Arc<SimulationState>,
}

impl SimulatedRobot {
    /// Creates a robot at the map origin.
    ///
    /// Odometry is published to `odometry`; detections and frames to
    /// `camera`.
    #[must_use]
    pub fn new(markers: Vec<PlacedMarker>, odometry: EventFanout, camera: EventFanout) -> Self {
        Self::with_motion(markers, odometry, camera, 4.0, Duration::from_millis(100))
    }

    /// Creates a robot driving at `speed` m/s, integrated every `step`.
    #[must_use]
    pub fn with_motion(
        markers: Vec<PlacedMarker>,
        odometry: EventFanout,
        camera: EventFanout,
        speed: f64,
        step: Duration,
    ) -> Self {
        Self {
            state: Arc::new(SimulationState {
                kinematics: Mutex::new(Kinematics::default()),
                markers,
                odometry,
                camera,
                speed,
                step,
                blank_frame: CameraFrame::new(RgbImage::new(FRAME_WIDTH, FRAME_HEIGHT)),
            }),
        }
    }

    /// Returns the current position.
    #[must_use]
    pub fn pose(&self) -> Point2 {
        self.state
            .kinematics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pose
    }

    /// Starts the camera and detector, publishing every `period`.
    #[must_use]
    pub fn start_camera(&self, period: Duration) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                state.publish_camera(period);
            }
        })
    }
}

impl SimulationState {
    fn publish_camera(&self, period: Duration) {
        let (pose, offset) = {
            let mut kinematics = self
                .kinematics
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let drift = kinematics.angular_z * period.as_secs_f64();
            kinematics.lateral_offset =
                (kinematics.lateral_offset + drift).clamp(-MAX_OFFSET, MAX_OFFSET);
            (kinematics.pose, kinematics.lateral_offset)
        };

        if let Some(marker) = self.visible_marker(pose) {
            let position = MarkerPosition::new(offset, 0.0, MARKER_DEPTH);
            self.camera
                .publish(&BehaviorEvent::Detection(Detection::single(marker.id, position)));
        }
        self.camera
            .publish(&BehaviorEvent::Frame(self.blank_frame.clone()));
    }

    fn visible_marker(&self, pose: Point2) -> Option<&PlacedMarker> {
        self.markers
            .iter()
            .find(|marker| marker.location.distance_to(pose) <= VISIBILITY_RADIUS)
    }

    /// Advances towards `target` by one step. Returns the new pose and
    /// whether the target was reached.
    fn advance(&self, target: Point2) -> (Point2, bool) {
        let mut kinematics = self
            .kinematics
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let reach = self.speed * self.step.as_secs_f64();
        let remaining = kinematics.pose.distance_to(target);
        if remaining <= reach {
            kinematics.pose = target;
            kinematics.lateral_offset = ARRIVAL_OFFSET;
            return (target, true);
        }
        let scale = reach / remaining;
        kinematics.pose = Point2::new(
            kinematics.pose.x + (target.x - kinematics.pose.x) * scale,
            kinematics.pose.y + (target.y - kinematics.pose.y) * scale,
        );
        (kinematics.pose, false)
    }
}

impl VelocitySink for SimulatedRobot {
    fn publish(&self, command: VelocityCommand) {
        self.state
            .kinematics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .angular_z = command.angular_z;
    }
}

#[async_trait]
impl NavigationClient for SimulatedRobot {
    async fn wait_for_server(&self, _timeout: Duration) -> bool {
        true
    }

    async fn send_goal(&self, goal: NavigationGoal) -> NavigationResult<GoalReceipt> {
        let (completer, receipt) = GoalReceipt::channel();
        let state = Arc::clone(&self.state);
        info!(waypoint = %goal.waypoint, "simulated navigation started");
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(state.step).await;
                let (pose, arrived) = state.advance(goal.target);
                state.odometry.publish(&BehaviorEvent::Odometry(pose));
                if arrived {
                    break;
                }
            }
            debug!(waypoint = %goal.waypoint, "simulated navigation arrived");
            completer.complete(NavigationOutcome::Succeeded);
        });
        Ok(receipt)
    }
}
