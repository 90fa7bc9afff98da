//! Detection-phase terminator.

use std::time::Duration;

use tracing::info;

use crate::behavior::domain::TaskOutcome;

const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Marks the end of the marker detection phase.
///
/// It finishes successfully on its first tick and takes no arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinishDetectionBehavior;

impl FinishDetectionBehavior {
    /// Creates the behavior.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the tick period.
    #[must_use]
    pub const fn tick_period(self) -> Duration {
        TICK_PERIOD
    }

    /// Finishes the step.
    #[must_use]
    pub fn tick(self, arguments: &[String]) -> TaskOutcome {
        info!(arguments = arguments.len(), "detection phase completed");
        TaskOutcome::succeeded("Detection phase completed")
    }
}
