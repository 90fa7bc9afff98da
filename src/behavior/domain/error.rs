//! Error types for behavior execution and plan parsing.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while executing a behavior step.
///
/// None of these is fatal to the process. Each is folded into a
/// [`super::TaskOutcome`] before the executor sees it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BehaviorError {
    /// The dispatched step carried fewer arguments than the behavior needs.
    #[error("insufficient arguments: expected at least {expected}, got {actual}")]
    InsufficientArguments {
        /// Minimum argument count.
        expected: usize,
        /// Received argument count.
        actual: usize,
    },

    /// The destination is not in the waypoint table.
    #[error("unknown waypoint: {0}")]
    UnknownWaypoint(String),

    /// A navigation or registry collaborator is not ready.
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// The behavior deadline elapsed.
    #[error("{activity} timed out after {after:?}")]
    Timeout {
        /// What was being waited for.
        activity: &'static str,
        /// Configured deadline.
        after: Duration,
    },
}

/// Error returned while parsing a behavior kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown behavior kind: {0}")]
pub struct ParseBehaviorKindError(pub String);

/// Errors returned while parsing a plan step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanStepError {
    /// The step text holds no action name.
    #[error("plan step is empty")]
    Empty,

    /// The action name is not a known behavior.
    #[error(transparent)]
    UnknownAction(#[from] ParseBehaviorKindError),
}
