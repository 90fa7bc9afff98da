//! Goal-based navigation client.
//!
//! A goal is sent once and its result is polled from later ticks through a
//! [`GoalReceipt`], so a behavior never blocks its tick on navigation.

use crate::behavior::domain::Point2;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

/// Result type for navigation operations.
pub type NavigationResult<T> = Result<T, NavigationError>;

/// A navigation goal: drive to `target`, labelled with its waypoint name.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationGoal {
    /// Waypoint name the goal was resolved from.
    pub waypoint: String,
    /// Target position in the map frame.
    pub target: Point2,
}

impl NavigationGoal {
    /// Creates a goal.
    #[must_use]
    pub fn new(waypoint: impl Into<String>, target: Point2) -> Self {
        Self {
            waypoint: waypoint.into(),
            target,
        }
    }
}

/// Terminal result of a navigation goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The target was reached.
    Succeeded,
    /// The navigator gave up.
    Aborted,
    /// The goal was cancelled.
    Canceled,
}

impl NavigationOutcome {
    /// Returns `true` for [`NavigationOutcome::Succeeded`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl fmt::Display for NavigationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Succeeded => "succeeded",
            Self::Aborted => "aborted",
            Self::Canceled => "canceled",
        })
    }
}

/// Polled state of an in-flight goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    /// No result yet.
    InFlight,
    /// The navigator reported a result.
    Done(NavigationOutcome),
}

/// Caller side of an accepted goal.
#[derive(Debug)]
pub struct GoalReceipt {
    result: oneshot::Receiver<NavigationOutcome>,
}

/// Navigator side of an accepted goal.
#[derive(Debug)]
pub struct GoalCompleter {
    result: oneshot::Sender<NavigationOutcome>,
}

impl GoalReceipt {
    /// Creates a connected completer and receipt.
    #[must_use]
    pub fn channel() -> (GoalCompleter, Self) {
        let (tx, rx) = oneshot::channel();
        (GoalCompleter { result: tx }, Self { result: rx })
    }

    /// Polls for the goal result without waiting.
    ///
    /// A completer dropped without reporting counts as
    /// [`NavigationOutcome::Aborted`].
    pub fn poll(&mut self) -> GoalStatus {
        match self.result.try_recv() {
            Ok(outcome) => GoalStatus::Done(outcome),
            Err(oneshot::error::TryRecvError::Empty) => GoalStatus::InFlight,
            Err(oneshot::error::TryRecvError::Closed) => {
                GoalStatus::Done(NavigationOutcome::Aborted)
            }
        }
    }
}

impl GoalCompleter {
    /// Reports the goal result. A receipt that was already dropped is
    /// ignored.
    pub fn complete(self, outcome: NavigationOutcome) {
        if self.result.send(outcome).is_err() {
            debug!(%outcome, "goal receipt dropped before completion");
        }
    }
}

/// Navigation action client.
#[async_trait]
pub trait NavigationClient: Send + Sync {
    /// Waits up to `timeout` for the navigation server.
    ///
    /// Returns `false` when the server did not come up in time.
    async fn wait_for_server(&self, timeout: Duration) -> bool;

    /// Sends a goal and returns a receipt for its result.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::Rejected`] when the server refuses the
    /// goal and [`NavigationError::Transport`] on a transport failure.
    async fn send_goal(&self, goal: NavigationGoal) -> NavigationResult<GoalReceipt>;
}

/// Errors returned by navigation clients.
#[derive(Debug, Clone, Error)]
pub enum NavigationError {
    /// The server refused the goal.
    #[error("navigation goal rejected: {0}")]
    Rejected(String),

    /// Transport-level failure.
    #[error("navigation transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NavigationError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
