//! Registry service actor and its request/reply handle.
//!
//! One task owns the [`MarkerStore`] and drives both the request queue and the
//! periodic snapshot broadcast from a single `select!` loop, so every access
//! is serialized without locks.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::registry::{
    adapters::memory::MarkerStore,
    domain::{MarkerId, RegistryLookupError, RegistrySnapshot, WaypointName},
    ports::{MarkerRegistry, MarkerRegistryError, MarkerRegistryResult},
};

const SERVICE_STOPPED: &str = "registry service stopped";

#[derive(Debug)]
enum RegistryRequest {
    Add {
        id: MarkerId,
        waypoint: WaypointName,
        reply: Option<oneshot::Sender<WaypointName>>,
    },
    GetNth {
        n: i64,
        reply: oneshot::Sender<Result<WaypointName, RegistryLookupError>>,
    },
    Snapshot {
        reply: oneshot::Sender<RegistrySnapshot>,
    },
}

/// Event loop owning the marker store.
#[derive(Debug)]
pub struct RegistryService {
    store: MarkerStore,
    requests: mpsc::Receiver<RegistryRequest>,
    broadcast: broadcast::Sender<RegistrySnapshot>,
    broadcast_period: Duration,
}

impl RegistryService {
    /// Creates the service and a handle connected to it.
    ///
    /// The service does nothing until [`RegistryService::run`] is awaited.
    #[must_use]
    pub fn new(config: &RegistryConfig) -> (Self, RegistryHandle) {
        let (request_tx, request_rx) = mpsc::channel(config.request_capacity.max(1));
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_capacity.max(1));
        let service = Self {
            store: MarkerStore::new(),
            requests: request_rx,
            broadcast: broadcast_tx.clone(),
            broadcast_period: config.broadcast_period(),
        };
        let handle = RegistryHandle {
            requests: request_tx,
            broadcast: broadcast_tx,
        };
        (service, handle)
    }

    /// Spawns the service on the current tokio runtime.
    #[must_use]
    pub fn spawn(config: &RegistryConfig) -> (RegistryHandle, JoinHandle<()>) {
        let (service, handle) = Self::new(config);
        let task = tokio::spawn(service.run());
        (handle, task)
    }

    /// Runs the loop until every [`RegistryHandle`] has been dropped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.broadcast_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period = ?self.broadcast_period, "registry service started");

        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(request) => self.handle(request),
                    None => break,
                },
                _ = ticker.tick() => self.publish_snapshot(),
            }
        }

        info!(markers = self.store.len(), "registry service stopped");
    }

    fn handle(&mut self, request: RegistryRequest) {
        match request {
            RegistryRequest::Add {
                id,
                waypoint,
                reply,
            } => {
                let stored = self.store.add(id, waypoint);
                info!(marker_id = %id, waypoint = %stored, "added marker");
                if let Some(reply) = reply {
                    if reply.send(stored).is_err() {
                        debug!(marker_id = %id, "add-marker caller went away");
                    }
                }
            }
            RegistryRequest::GetNth { n, reply } => {
                let result = self.store.nth(n);
                match &result {
                    Ok(waypoint) => info!(n, waypoint = %waypoint, "resolved nth marker"),
                    Err(err) => warn!(n, error = %err, "nth marker lookup failed"),
                }
                if reply.send(result).is_err() {
                    debug!(n, "get-nth caller went away");
                }
            }
            RegistryRequest::Snapshot { reply } => {
                if reply.send(self.store.snapshot()).is_err() {
                    debug!("snapshot caller went away");
                }
            }
        }
    }

    fn publish_snapshot(&self) {
        let snapshot = self.store.snapshot();
        let count = snapshot.len();
        match self.broadcast.send(snapshot) {
            Ok(receivers) => debug!(markers = count, receivers, "broadcast registry snapshot"),
            Err(_) => debug!(markers = count, "no snapshot subscribers"),
        }
    }
}

/// Cloneable client for a running [`RegistryService`].
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    requests: mpsc::Sender<RegistryRequest>,
    broadcast: broadcast::Sender<RegistrySnapshot>,
}

impl RegistryHandle {
    /// Subscribes to the periodic snapshot broadcast.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistrySnapshot> {
        self.broadcast.subscribe()
    }

    /// Returns `true` while the service loop is accepting requests.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.requests.is_closed()
    }

    async fn request(&self, request: RegistryRequest) -> MarkerRegistryResult<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| MarkerRegistryError::Unavailable(SERVICE_STOPPED.to_owned()))
    }
}

#[async_trait]
impl MarkerRegistry for RegistryHandle {
    async fn add_marker(
        &self,
        id: MarkerId,
        waypoint: WaypointName,
    ) -> MarkerRegistryResult<WaypointName> {
        let (reply, response) = oneshot::channel();
        self.request(RegistryRequest::Add {
            id,
            waypoint,
            reply: Some(reply),
        })
        .await?;
        response.await.map_err(MarkerRegistryError::transport)
    }

    fn submit_marker(&self, id: MarkerId, waypoint: WaypointName) -> MarkerRegistryResult<()> {
        self.requests
            .try_send(RegistryRequest::Add {
                id,
                waypoint,
                reply: None,
            })
            .map_err(|err| match err {
                mpsc::error::TrySendError::Full(_) => {
                    MarkerRegistryError::Unavailable("registry request queue full".to_owned())
                }
                mpsc::error::TrySendError::Closed(_) => {
                    MarkerRegistryError::Unavailable(SERVICE_STOPPED.to_owned())
                }
            })
    }

    async fn get_nth_marker(&self, n: i64) -> MarkerRegistryResult<WaypointName> {
        let (reply, response) = oneshot::channel();
        self.request(RegistryRequest::GetNth { n, reply }).await?;
        let result = response.await.map_err(MarkerRegistryError::transport)?;
        Ok(result?)
    }

    async fn snapshot(&self) -> MarkerRegistryResult<RegistrySnapshot> {
        let (reply, response) = oneshot::channel();
        self.request(RegistryRequest::Snapshot { reply }).await?;
        response.await.map_err(MarkerRegistryError::transport)
    }

    async fn wait_until_ready(&self, timeout: Duration) -> bool {
        if self.requests.is_closed() {
            return false;
        }
        matches!(
            tokio::time::timeout(timeout, self.requests.reserve()).await,
            Ok(Ok(_))
        )
    }
}
