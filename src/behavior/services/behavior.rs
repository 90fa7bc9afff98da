//! Tag-dispatched behavior variants.

use std::time::Duration;

use mockable::Clock;

use super::{
    AlignBehavior, FinishDetectionBehavior, MoveBehavior, PhotographBehavior,
    RotateAndDetectBehavior,
};
use crate::behavior::domain::{BehaviorKind, TaskOutcome};

/// One behavior instance of each supported kind.
pub enum Behavior<C: Clock> {
    /// Align to the detected marker.
    Align(AlignBehavior<C>),
    /// Tour waypoints, then registry destinations.
    Move(MoveBehavior<C>),
    /// Sweep for a marker and register it.
    RotateAndDetect(RotateAndDetectBehavior<C>),
    /// Photograph the detected marker.
    Photograph(PhotographBehavior<C>),
    /// Close the detection phase.
    FinishDetection(FinishDetectionBehavior),
}

impl<C: Clock> Behavior<C> {
    /// Returns the plan action this variant serves.
    #[must_use]
    pub const fn kind(&self) -> BehaviorKind {
        match self {
            Self::Align(_) => BehaviorKind::Align,
            Self::Move(_) => BehaviorKind::Move,
            Self::RotateAndDetect(_) => BehaviorKind::RotateAndDetect,
            Self::Photograph(_) => BehaviorKind::Photograph,
            Self::FinishDetection(_) => BehaviorKind::FinishDetection,
        }
    }

    /// Returns the period the executor ticks this behavior at.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        match self {
            Self::Align(behavior) => behavior.tick_period(),
            Self::Move(behavior) => behavior.tick_period(),
            Self::RotateAndDetect(behavior) => behavior.tick_period(),
            Self::Photograph(behavior) => behavior.tick_period(),
            Self::FinishDetection(behavior) => behavior.tick_period(),
        }
    }

    /// Advances the wrapped behavior by one tick.
    pub async fn tick(&mut self, arguments: &[String]) -> TaskOutcome {
        match self {
            Self::Align(behavior) => behavior.tick(arguments),
            Self::Move(behavior) => behavior.tick(arguments).await,
            Self::RotateAndDetect(behavior) => behavior.tick(arguments).await,
            Self::Photograph(behavior) => behavior.tick(arguments),
            Self::FinishDetection(behavior) => behavior.tick(arguments),
        }
    }
}

impl<C: Clock> From<AlignBehavior<C>> for Behavior<C> {
    fn from(behavior: AlignBehavior<C>) -> Self {
        Self::Align(behavior)
    }
}

impl<C: Clock> From<MoveBehavior<C>> for Behavior<C> {
    fn from(behavior: MoveBehavior<C>) -> Self {
        Self::Move(behavior)
    }
}

impl<C: Clock> From<RotateAndDetectBehavior<C>> for Behavior<C> {
    fn from(behavior: RotateAndDetectBehavior<C>) -> Self {
        Self::RotateAndDetect(behavior)
    }
}

impl<C: Clock> From<PhotographBehavior<C>> for Behavior<C> {
    fn from(behavior: PhotographBehavior<C>) -> Self {
        Self::Photograph(behavior)
    }
}

impl<C: Clock> From<FinishDetectionBehavior> for Behavior<C> {
    fn from(behavior: FinishDetectionBehavior) -> Self {
        Self::FinishDetection(behavior)
    }
}
