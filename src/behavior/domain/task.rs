//! Per-step task state and tick outcomes.

use super::BehaviorError;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::time::Duration;

/// State of one dispatched plan step, owned by the behavior running it.
///
/// A task is created on the first tick after a step is dispatched and is
/// dropped when the step finishes or times out.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorTask {
    arguments: Vec<String>,
    started_at: DateTime<Utc>,
    progress: f64,
    completed: bool,
}

impl BehaviorTask {
    /// Starts a task for the given step arguments.
    #[must_use]
    pub fn start(arguments: &[String], clock: &impl Clock) -> Self {
        Self {
            arguments: arguments.to_vec(),
            started_at: clock.utc(),
            progress: 0.0,
            completed: false,
        }
    }

    /// Returns the ordered step arguments.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Returns the argument at `index`, if present.
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    /// Returns when the task started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the time elapsed since the task started.
    ///
    /// A clock that moved backwards yields zero.
    #[must_use]
    pub fn elapsed(&self, clock: &impl Clock) -> Duration {
        (clock.utc() - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Returns `true` once strictly more than `timeout` has elapsed.
    #[must_use]
    pub fn is_expired(&self, clock: &impl Clock, timeout: Duration) -> bool {
        self.elapsed(clock) > timeout
    }

    /// Records progress as the elapsed fraction of `timeout`.
    pub fn track_elapsed(&mut self, clock: &impl Clock, timeout: Duration) -> f64 {
        let ratio = if timeout.is_zero() {
            1.0
        } else {
            self.elapsed(clock).as_secs_f64() / timeout.as_secs_f64()
        };
        self.set_progress(ratio);
        self.progress
    }

    /// Returns the last recorded progress in `[0, 1]`.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Records progress, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = clamp_ratio(progress);
    }

    /// Marks the task completed.
    pub const fn complete(&mut self) {
        self.completed = true;
    }

    /// Returns `true` once the task has completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns `true` while the task has not completed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Checks that a step carries at least `expected` arguments.
///
/// # Errors
///
/// Returns [`BehaviorError::InsufficientArguments`] on a shortfall.
pub const fn require_arguments(arguments: &[String], expected: usize) -> Result<(), BehaviorError> {
    if arguments.len() < expected {
        return Err(BehaviorError::InsufficientArguments {
            expected,
            actual: arguments.len(),
        });
    }
    Ok(())
}

/// Terminal report for a step: `finish(success, ratio, message)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    success: bool,
    progress: f64,
    message: String,
}

impl Completion {
    /// Creates a completion report.
    #[must_use]
    pub fn new(success: bool, progress: f64, message: impl Into<String>) -> Self {
        Self {
            success,
            progress: clamp_ratio(progress),
            message: message.into(),
        }
    }

    /// A successful completion at full progress.
    #[must_use]
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self::new(true, 1.0, message)
    }

    /// A failed completion at zero progress.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(false, 0.0, message)
    }

    /// Returns whether the step succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Returns the final progress ratio.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Returns the completion message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of one behavior tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Nothing to report; the behavior is waiting on a collaborator or data.
    Pending,
    /// Still running; forwarded to the executor as feedback.
    Running {
        /// Progress ratio in `[0, 1]`.
        progress: f64,
        /// Human-readable status.
        message: String,
    },
    /// The step is over; forwarded to the executor as its single finish.
    Finished(Completion),
}

impl TaskOutcome {
    /// Running feedback with a clamped ratio.
    #[must_use]
    pub fn running(progress: f64, message: impl Into<String>) -> Self {
        Self::Running {
            progress: clamp_ratio(progress),
            message: message.into(),
        }
    }

    /// Successful completion at full progress.
    #[must_use]
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self::Finished(Completion::succeeded(message))
    }

    /// Failed completion at zero progress.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Finished(Completion::failed(message))
    }

    /// Folds a behavior error into the outcome the executor should see.
    ///
    /// Unavailable collaborators are absorbed as a no-op tick so the step is
    /// retried on the next tick.
    #[must_use]
    pub fn from_error(err: &BehaviorError) -> Self {
        match err {
            BehaviorError::InsufficientArguments { .. } => Self::failed("Insufficient arguments"),
            BehaviorError::UnknownWaypoint(name) => Self::failed(format!("Unknown waypoint: {name}")),
            BehaviorError::CollaboratorUnavailable(_) => Self::Pending,
            BehaviorError::Timeout { .. } => Self::failed(err.to_string()),
        }
    }

    /// Returns `true` for [`TaskOutcome::Finished`].
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// Returns the completion report when finished.
    #[must_use]
    pub const fn completion(&self) -> Option<&Completion> {
        match self {
            Self::Finished(completion) => Some(completion),
            Self::Pending | Self::Running { .. } => None,
        }
    }
}

fn clamp_ratio(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
