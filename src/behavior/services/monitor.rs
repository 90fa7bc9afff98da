//! Plan progress bookkeeping.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::behavior::{
    domain::{Completion, PlanStep},
    ports::ExecutorReporter,
};

/// Execution status of one plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Not dispatched yet.
    NotExecuted,
    /// Dispatched and reporting feedback.
    Executing,
    /// Finished successfully.
    Succeeded,
    /// Finished unsuccessfully.
    Failed,
}

/// Progress record of one plan step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepProgress {
    /// The step text, e.g. `(move robot wp1 wp2)`.
    pub action: String,
    /// Current status.
    pub status: StepStatus,
    /// Completion ratio in `[0, 1]`.
    pub completion: f64,
    /// Last feedback or finish message.
    pub message: String,
}

/// Tracks per-step completion for a plan and logs its progress.
#[derive(Debug)]
pub struct PlanProgressMonitor {
    steps: Mutex<Vec<(PlanStep, StepProgress)>>,
}

impl PlanProgressMonitor {
    /// Creates a monitor with every step of `plan` not yet executed.
    #[must_use]
    pub fn new(plan: &[PlanStep]) -> Self {
        let steps = plan
            .iter()
            .map(|step| {
                let progress = StepProgress {
                    action: step.to_string(),
                    status: StepStatus::NotExecuted,
                    completion: 0.0,
                    message: String::new(),
                };
                (step.clone(), progress)
            })
            .collect();
        Self {
            steps: Mutex::new(steps),
        }
    }

    /// Returns a copy of every step record in plan order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StepProgress> {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, progress)| progress.clone())
            .collect()
    }

    /// Returns the status of the first record matching `step`.
    #[must_use]
    pub fn status(&self, step: &PlanStep) -> Option<StepStatus> {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(planned, _)| planned == step)
            .map(|(_, progress)| progress.status)
    }

    /// Returns `true` once every step has reached full completion.
    #[must_use]
    pub fn all_done(&self) -> bool {
        self.steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .all(|(_, progress)| progress.completion >= 1.0)
    }

    fn update(&self, step: &PlanStep, apply: impl FnOnce(&mut StepProgress)) {
        let mut steps = self.steps.lock().unwrap_or_else(PoisonError::into_inner);
        let open = steps.iter_mut().find(|(planned, progress)| {
            planned == step
                && matches!(
                    progress.status,
                    StepStatus::NotExecuted | StepStatus::Executing
                )
        });
        let Some((_, progress)) = open else {
            warn!(step = %step, "report for a step outside the plan");
            return;
        };
        apply(progress);
    }
}

impl ExecutorReporter for PlanProgressMonitor {
    fn feedback(&self, step: &PlanStep, progress: f64, message: &str) {
        debug!(step = %step, progress, message, "step feedback");
        self.update(step, |record| {
            record.status = StepStatus::Executing;
            record.completion = progress;
            message.clone_into(&mut record.message);
        });
    }

    fn finish(&self, step: &PlanStep, completion: &Completion) {
        info!(
            step = %step,
            success = completion.success(),
            progress = completion.progress(),
            message = completion.message(),
            "step finished"
        );
        self.update(step, |record| {
            record.status = if completion.success() {
                StepStatus::Succeeded
            } else {
                StepStatus::Failed
            };
            record.completion = completion.progress();
            completion.message().clone_into(&mut record.message);
        });
    }
}
