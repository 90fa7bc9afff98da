//! Port contracts between behaviors and the robot, storage and executor.

pub mod navigation;
pub mod photo;
pub mod reporter;
pub mod velocity;

pub use navigation::{
    GoalCompleter, GoalReceipt, GoalStatus, NavigationClient, NavigationError, NavigationGoal,
    NavigationOutcome, NavigationResult,
};
pub use photo::{PhotoStore, PhotoStoreError, PhotoStoreResult};
pub use reporter::ExecutorReporter;
pub use velocity::VelocitySink;
