//! Feedback channel from a running step to the plan executor.

use crate::behavior::domain::{Completion, PlanStep};

/// Receives progress feedback and the single finish report of each step.
pub trait ExecutorReporter: Send + Sync {
    /// Reports intermediate progress for a running step.
    fn feedback(&self, step: &PlanStep, progress: f64, message: &str);

    /// Reports the terminal result of a step. Called exactly once per step.
    fn finish(&self, step: &PlanStep, completion: &Completion);
}
