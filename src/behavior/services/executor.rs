//! Plan execution: per-step tick loops and in-order plan runs.

use std::sync::Arc;

use mockable::Clock;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::Behavior;
use crate::behavior::{
    domain::{Completion, PlanStep, TaskOutcome},
    ports::ExecutorReporter,
};

/// Ticks one behavior at its period until the dispatched step finishes.
#[derive(Clone)]
pub struct ActionRunner {
    reporter: Arc<dyn ExecutorReporter>,
}

impl ActionRunner {
    /// Creates a runner reporting to `reporter`.
    #[must_use]
    pub fn new(reporter: Arc<dyn ExecutorReporter>) -> Self {
        Self { reporter }
    }

    /// Runs `step` on `behavior` to completion.
    ///
    /// Running ticks become feedback, pending ticks are silent, and the
    /// finishing tick is reported exactly once and returned.
    pub async fn run<C: Clock>(&self, behavior: &mut Behavior<C>, step: &PlanStep) -> Completion {
        let mut ticker = tokio::time::interval(behavior.tick_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(step = %step, "dispatching step");

        loop {
            ticker.tick().await;
            match behavior.tick(step.arguments()).await {
                TaskOutcome::Pending => {}
                TaskOutcome::Running { progress, message } => {
                    self.reporter.feedback(step, progress, &message);
                }
                TaskOutcome::Finished(completion) => {
                    self.reporter.finish(step, &completion);
                    return completion;
                }
            }
        }
    }
}

/// Result of one executed plan step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// The dispatched step.
    pub step: PlanStep,
    /// Its finish report.
    pub completion: Completion,
}

/// Outcome of a plan run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanReport {
    steps: Vec<StepReport>,
    planned: usize,
}

impl PlanReport {
    /// Returns the executed steps in order.
    #[must_use]
    pub fn steps(&self) -> &[StepReport] {
        &self.steps
    }

    /// Returns the number of steps in the plan.
    #[must_use]
    pub const fn planned(&self) -> usize {
        self.planned
    }

    /// Returns the step that stopped the run, if any.
    #[must_use]
    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps.iter().find(|report| !report.completion.success())
    }

    /// Returns `true` when every planned step ran and succeeded.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.steps.len() == self.planned && self.failed_step().is_none()
    }
}

/// Runs plan steps in order, stopping at the first failure.
pub struct PlanExecutor<C: Clock> {
    behaviors: Vec<Behavior<C>>,
    runner: ActionRunner,
}

impl<C: Clock> PlanExecutor<C> {
    /// Creates an executor with no behaviors.
    #[must_use]
    pub const fn new(runner: ActionRunner) -> Self {
        Self {
            behaviors: Vec::new(),
            runner,
        }
    }

    /// Installs `behavior`, replacing any behavior of the same kind.
    #[must_use]
    pub fn with_behavior(mut self, behavior: impl Into<Behavior<C>>) -> Self {
        let incoming = behavior.into();
        self.behaviors
            .retain(|existing| existing.kind() != incoming.kind());
        self.behaviors.push(incoming);
        self
    }

    /// Returns the installed behavior serving `step`, if any.
    pub fn behavior_mut(&mut self, step: &PlanStep) -> Option<&mut Behavior<C>> {
        self.behaviors
            .iter_mut()
            .find(|behavior| behavior.kind() == step.kind())
    }

    /// Executes `plan` in order.
    ///
    /// A step without an installed behavior fails the run.
    pub async fn execute(&mut self, plan: &[PlanStep]) -> PlanReport {
        let mut report = PlanReport {
            steps: Vec::with_capacity(plan.len()),
            planned: plan.len(),
        };

        for step in plan {
            let completion = self.run_step(step).await;
            let success = completion.success();
            report.steps.push(StepReport {
                step: step.clone(),
                completion,
            });
            if !success {
                warn!(step = %step, "plan step failed; stopping plan");
                break;
            }
        }

        info!(
            executed = report.steps.len(),
            planned = report.planned,
            succeeded = report.succeeded(),
            "plan finished"
        );
        report
    }

    async fn run_step(&mut self, step: &PlanStep) -> Completion {
        let Some(behavior) = self
            .behaviors
            .iter_mut()
            .find(|behavior| behavior.kind() == step.kind())
        else {
            let missing = Completion::failed(format!("No behavior for {}", step.kind()));
            self.runner.reporter.finish(step, &missing);
            return missing;
        };
        self.runner.run(behavior, step).await
    }
}
