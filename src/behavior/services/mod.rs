//! Behavior state machines and the plan executor that drives them.

mod align;
mod behavior;
mod executor;
mod finish;
mod inbox;
mod monitor;
mod navigate;
mod photograph;
mod rotate;

pub use align::{AlignBehavior, AlignPhase};
pub use behavior::Behavior;
pub use executor::{ActionRunner, PlanExecutor, PlanReport, StepReport};
pub use finish::FinishDetectionBehavior;
pub use inbox::{EventFanout, Inbox, InboxSender, forward_snapshots, inbox};
pub use monitor::{PlanProgressMonitor, StepProgress, StepStatus};
pub use navigate::MoveBehavior;
pub use photograph::{PhotographBehavior, PhotographPhase};
pub use rotate::{MarkerSighting, RotateAndDetectBehavior, RotatePhase};
