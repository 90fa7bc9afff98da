//! In-memory port implementations for tests and dry runs.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbImage;

use crate::behavior::{
    domain::{Completion, PlanStep, VelocityCommand},
    ports::{
        ExecutorReporter, GoalCompleter, GoalReceipt, NavigationClient, NavigationError,
        NavigationGoal, NavigationOutcome, NavigationResult, PhotoStore, PhotoStoreError,
        PhotoStoreResult, VelocitySink,
    },
};
use crate::registry::domain::MarkerId;

/// Velocity sink that records every published command.
#[derive(Debug, Clone, Default)]
pub struct RecordingVelocitySink {
    commands: Arc<Mutex<Vec<VelocityCommand>>>,
}

impl RecordingVelocitySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every command published so far.
    #[must_use]
    pub fn commands(&self) -> Vec<VelocityCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent command.
    #[must_use]
    pub fn last(&self) -> Option<VelocityCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    /// Forgets recorded commands.
    pub fn clear(&self) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl VelocitySink for RecordingVelocitySink {
    fn publish(&self, command: VelocityCommand) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}

/// Navigation client whose goals are completed explicitly by the caller.
#[derive(Debug, Clone)]
pub struct ScriptedNavigator {
    state: Arc<ScriptedNavigatorState>,
}

#[derive(Debug)]
struct ScriptedNavigatorState {
    server_ready: AtomicBool,
    goals: Mutex<Vec<NavigationGoal>>,
    open: Mutex<VecDeque<GoalCompleter>>,
}

impl Default for ScriptedNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedNavigator {
    /// Creates a navigator whose server is ready.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(ScriptedNavigatorState {
                server_ready: AtomicBool::new(true),
                goals: Mutex::new(Vec::new()),
                open: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Makes the server available or unavailable.
    pub fn set_server_ready(&self, ready: bool) {
        self.state.server_ready.store(ready, Ordering::SeqCst);
    }

    /// Returns every goal received, in order.
    #[must_use]
    pub fn goals(&self) -> Vec<NavigationGoal> {
        self.state
            .goals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of goals awaiting a result.
    #[must_use]
    pub fn open_goals(&self) -> usize {
        self.state
            .open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Completes the oldest open goal. Returns `false` when none is open.
    #[must_use]
    pub fn complete_next(&self, outcome: NavigationOutcome) -> bool {
        let next = self
            .state
            .open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some(completer) = next else {
            return false;
        };
        completer.complete(outcome);
        true
    }
}

#[async_trait]
impl NavigationClient for ScriptedNavigator {
    async fn wait_for_server(&self, _timeout: Duration) -> bool {
        self.state.server_ready.load(Ordering::SeqCst)
    }

    async fn send_goal(&self, goal: NavigationGoal) -> NavigationResult<GoalReceipt> {
        if !self.state.server_ready.load(Ordering::SeqCst) {
            return Err(NavigationError::Rejected("server not ready".to_owned()));
        }
        let (completer, receipt) = GoalReceipt::channel();
        self.state
            .goals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(goal);
        self.state
            .open
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(completer);
        Ok(receipt)
    }
}

/// Photo store keeping images in memory, keyed by marker id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPhotoStore {
    photos: Arc<Mutex<HashMap<MarkerId, RgbImage>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryPhotoStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent saves fail with an I/O error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the stored photograph of `marker`.
    #[must_use]
    pub fn photo(&self, marker: MarkerId) -> Option<RgbImage> {
        self.photos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&marker)
            .cloned()
    }

    /// Returns the number of stored photographs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.photos
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when no photograph is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PhotoStore for InMemoryPhotoStore {
    fn save(&self, marker: MarkerId, image: &RgbImage) -> PhotoStoreResult<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PhotoStoreError::io(std::io::Error::other(
                "photo store unavailable",
            )));
        }
        self.photos
            .lock()
            .map_err(|err| PhotoStoreError::io(std::io::Error::other(err.to_string())))?
            .insert(marker, image.clone());
        Ok(format!("{marker}.png"))
    }
}

/// One report received by a [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    /// Intermediate feedback.
    Feedback {
        /// Step text.
        step: String,
        /// Progress ratio.
        progress: f64,
        /// Feedback message.
        message: String,
    },
    /// Terminal report.
    Finish {
        /// Step text.
        step: String,
        /// Finish report.
        completion: Completion,
    },
}

/// Executor reporter that records every report.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every report in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns only the finish reports.
    #[must_use]
    pub fn finishes(&self) -> Vec<Completion> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::Finish { completion, .. } => Some(completion),
                ReportEvent::Feedback { .. } => None,
            })
            .collect()
    }
}

impl ExecutorReporter for RecordingReporter {
    fn feedback(&self, step: &PlanStep, progress: f64, message: &str) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ReportEvent::Feedback {
                step: step.to_string(),
                progress,
                message: message.to_owned(),
            });
    }

    fn finish(&self, step: &PlanStep, completion: &Completion) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ReportEvent::Finish {
                step: step.to_string(),
                completion: completion.clone(),
            });
    }
}
