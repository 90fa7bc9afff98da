//! Move/explore behavior.
//!
//! Tours the waypoint table first. Once every tour waypoint has been
//! reached, destinations are drawn in ascending marker-id order from the
//! latest registry broadcast. At most one navigation goal is in flight.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::{debug, info, warn};

use super::Inbox;
use crate::behavior::{
    domain::{
        BehaviorError, BehaviorEvent, BehaviorTask, Completion, Point2, PoseSample, TaskOutcome,
        WaypointTable, require_arguments,
    },
    ports::{GoalReceipt, GoalStatus, NavigationClient, NavigationGoal, NavigationOutcome},
};
use crate::config::NavigationConfig;
use crate::registry::domain::RegistrySnapshot;

const REQUIRED_ARGUMENTS: usize = 3;
const DESTINATION_ARGUMENT: usize = 2;

struct InFlightGoal {
    waypoint: String,
    target: Point2,
    start: PoseSample,
    receipt: GoalReceipt,
}

impl InFlightGoal {
    fn progress(&self, pose: PoseSample) -> f64 {
        let total = self.start.distance_to(self.target);
        if total <= f64::EPSILON {
            return 1.0;
        }
        let remaining = pose.distance_to(self.target);
        1.0 - (remaining / total).min(1.0)
    }
}

/// Drives the robot to plan destinations through the navigation client.
pub struct MoveBehavior<C: Clock> {
    table: WaypointTable,
    server_wait: Duration,
    tick_period: Duration,
    clock: Arc<C>,
    navigator: Arc<dyn NavigationClient>,
    inbox: Inbox,
    task: Option<BehaviorTask>,
    goal: Option<InFlightGoal>,
    pose: PoseSample,
    visited: usize,
    cursor: usize,
    markers: RegistrySnapshot,
    pending_destination: Option<String>,
}

impl<C: Clock> MoveBehavior<C> {
    /// Creates a move behavior that has visited no waypoint yet.
    #[must_use]
    pub fn new(
        config: &NavigationConfig,
        clock: Arc<C>,
        navigator: Arc<dyn NavigationClient>,
        inbox: Inbox,
    ) -> Self {
        Self {
            table: config.waypoint_table(),
            server_wait: config.server_wait(),
            tick_period: config.tick_period(),
            clock,
            navigator,
            inbox,
            task: None,
            goal: None,
            pose: PoseSample::default(),
            visited: 0,
            cursor: 0,
            markers: RegistrySnapshot::default(),
            pending_destination: None,
        }
    }

    /// Returns how many tour waypoints have been reached.
    #[must_use]
    pub const fn visited_count(&self) -> usize {
        self.visited
    }

    /// Returns the index of the next registry entry to draw.
    #[must_use]
    pub const fn registry_cursor(&self) -> usize {
        self.cursor
    }

    /// Returns `true` while a navigation goal is outstanding.
    #[must_use]
    pub const fn has_goal_in_flight(&self) -> bool {
        self.goal.is_some()
    }

    /// Returns the tick period.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Advances the behavior by one tick.
    pub async fn tick(&mut self, arguments: &[String]) -> TaskOutcome {
        for event in self.inbox.drain() {
            match event {
                BehaviorEvent::Odometry(pose) => self.pose = pose,
                BehaviorEvent::Markers(snapshot) => self.markers = snapshot,
                BehaviorEvent::Detection(_) | BehaviorEvent::Frame(_) => {}
            }
        }

        if self.goal.is_some() {
            return self.poll_goal();
        }

        match self.issue_goal(arguments).await {
            Ok(outcome) => outcome,
            Err(err) => {
                if !matches!(err, BehaviorError::CollaboratorUnavailable(_)) {
                    warn!(error = %err, "move step rejected");
                    self.task = None;
                }
                TaskOutcome::from_error(&err)
            }
        }
    }

    fn poll_goal(&mut self) -> TaskOutcome {
        let Some(goal) = self.goal.as_mut() else {
            return TaskOutcome::Pending;
        };
        match goal.receipt.poll() {
            GoalStatus::InFlight => {
                let progress = goal.progress(self.pose);
                let message = format!("Moving to {}", goal.waypoint);
                if let Some(task) = self.task.as_mut() {
                    task.set_progress(progress);
                }
                TaskOutcome::running(progress, message)
            }
            GoalStatus::Done(outcome) => {
                let waypoint = goal.waypoint.clone();
                self.goal = None;
                self.task = None;
                self.on_goal_done(&waypoint, outcome)
            }
        }
    }

    fn on_goal_done(&mut self, waypoint: &str, outcome: NavigationOutcome) -> TaskOutcome {
        if outcome.is_success() {
            self.visited = (self.visited + 1).min(self.table.len());
            info!(waypoint, visited = self.visited, "reached waypoint");
            return TaskOutcome::succeeded("Move completed");
        }
        warn!(waypoint, %outcome, "navigation goal did not succeed");
        TaskOutcome::Finished(Completion::new(
            true,
            1.0,
            format!("Move failed: navigation {outcome}"),
        ))
    }

    async fn issue_goal(&mut self, arguments: &[String]) -> Result<TaskOutcome, BehaviorError> {
        require_arguments(arguments, REQUIRED_ARGUMENTS)?;
        if self.task.is_none() {
            self.task = Some(BehaviorTask::start(arguments, self.clock.as_ref()));
        }

        let destination = if self.visited < self.table.len() {
            arguments
                .get(DESTINATION_ARGUMENT)
                .cloned()
                .unwrap_or_default()
        } else {
            let Some(drawn) = self.next_registry_destination() else {
                debug!(cursor = self.cursor, "no further registry destination yet");
                return Ok(TaskOutcome::Pending);
            };
            drawn
        };

        let target = match self.table.resolve(&destination) {
            Ok(target) => target,
            Err(err) => {
                self.pending_destination = None;
                return Err(err);
            }
        };

        if !self.navigator.wait_for_server(self.server_wait).await {
            return Err(BehaviorError::CollaboratorUnavailable(
                "navigation server".to_owned(),
            ));
        }
        let receipt = self
            .navigator
            .send_goal(NavigationGoal::new(destination.clone(), target))
            .await
            .map_err(|err| BehaviorError::CollaboratorUnavailable(err.to_string()))?;

        info!(
            waypoint = %destination,
            x = target.x,
            y = target.y,
            "navigation goal sent"
        );
        self.pending_destination = None;
        self.goal = Some(InFlightGoal {
            waypoint: destination.clone(),
            target,
            start: self.pose,
            receipt,
        });
        Ok(TaskOutcome::running(0.0, format!("Moving to {destination}")))
    }

    fn next_registry_destination(&mut self) -> Option<String> {
        if let Some(pending) = &self.pending_destination {
            return Some(pending.clone());
        }
        let record = self.markers.get(self.cursor)?;
        let waypoint = record.origin_waypoint().as_str().to_owned();
        info!(
            cursor = self.cursor,
            marker_id = %record.id(),
            waypoint = %waypoint,
            "drawing destination from marker registry"
        );
        self.cursor += 1;
        self.pending_destination = Some(waypoint.clone());
        Some(waypoint)
    }
}
