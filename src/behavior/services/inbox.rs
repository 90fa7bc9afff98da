//! Bounded per-behavior inboxes for out-of-band events.
//!
//! Sensor callbacks never touch behavior state directly. They enqueue
//! [`BehaviorEvent`]s that the owning behavior drains at the start of its
//! next tick.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::behavior::domain::BehaviorEvent;
use crate::registry::domain::RegistrySnapshot;

/// Creates a connected inbox pair keeping the newest `capacity` events.
///
/// An inbox that is not drained for a while overwrites its oldest events, so
/// a behavior resuming after other steps sees recent sensor data.
#[must_use]
pub fn inbox(capacity: usize) -> (InboxSender, Inbox) {
    let (tx, rx) = broadcast::channel(capacity.max(1));
    (InboxSender { tx }, Inbox { rx })
}

/// Receiving half, owned by exactly one behavior.
#[derive(Debug)]
pub struct Inbox {
    rx: broadcast::Receiver<BehaviorEvent>,
}

impl Inbox {
    /// Removes and returns every queued event in arrival order.
    pub fn drain(&mut self) -> Vec<BehaviorEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "behavior inbox overwrote old events");
                }
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => break,
            }
        }
        events
    }
}

/// Cloneable sending half handed to sensor sources.
#[derive(Debug, Clone)]
pub struct InboxSender {
    tx: broadcast::Sender<BehaviorEvent>,
}

impl InboxSender {
    /// Enqueues an event without waiting.
    ///
    /// Returns `false` when the owning behavior has been dropped.
    #[must_use]
    pub fn send(&self, event: BehaviorEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Returns `true` once the owning behavior has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.receiver_count() == 0
    }
}

/// Delivers each event to several inboxes.
#[derive(Debug, Clone, Default)]
pub struct EventFanout {
    targets: Vec<InboxSender>,
}

impl EventFanout {
    /// Creates a fanout with no targets.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    /// Adds a target inbox.
    #[must_use]
    pub fn with_target(mut self, target: InboxSender) -> Self {
        self.targets.push(target);
        self
    }

    /// Sends a copy of `event` to every target. Closed targets miss the
    /// event.
    pub fn publish(&self, event: &BehaviorEvent) {
        for target in &self.targets {
            if !target.send(event.clone()) {
                debug!("fanout target closed");
            }
        }
    }

    /// Returns the number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` when there is no target.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Forwards registry broadcasts into `target` as [`BehaviorEvent::Markers`].
///
/// The task ends when the registry stops or the target inbox is dropped.
#[must_use]
pub fn forward_snapshots(
    mut snapshots: broadcast::Receiver<RegistrySnapshot>,
    target: InboxSender,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match snapshots.recv().await {
                Ok(snapshot) => {
                    if !target.send(BehaviorEvent::Markers(snapshot)) {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "snapshot forwarder lagged behind the registry");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!("snapshot forwarder stopped");
    })
}
