//! Request/reply port for registering and querying discovered markers.

use crate::registry::domain::{MarkerId, RegistryLookupError, RegistrySnapshot, WaypointName};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for marker registry operations.
pub type MarkerRegistryResult<T> = Result<T, MarkerRegistryError>;

/// Marker registry contract.
#[async_trait]
pub trait MarkerRegistry: Send + Sync {
    /// Upserts the record for `id` and echoes the stored waypoint.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerRegistryError::Unavailable`] when the registry cannot
    /// be reached. The upsert itself always succeeds.
    async fn add_marker(
        &self,
        id: MarkerId,
        waypoint: WaypointName,
    ) -> MarkerRegistryResult<WaypointName>;

    /// Queues an upsert without waiting for the reply.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerRegistryError::Unavailable`] when the request could
    /// not be queued.
    fn submit_marker(&self, id: MarkerId, waypoint: WaypointName) -> MarkerRegistryResult<()>;

    /// Returns the origin waypoint of the marker with the `n`-th lowest id.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerRegistryError::Lookup`] for an empty registry or an
    /// out-of-range index and [`MarkerRegistryError::Unavailable`] when the
    /// registry cannot be reached.
    async fn get_nth_marker(&self, n: i64) -> MarkerRegistryResult<WaypointName>;

    /// Returns the current id-sorted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerRegistryError::Unavailable`] when the registry cannot
    /// be reached.
    async fn snapshot(&self) -> MarkerRegistryResult<RegistrySnapshot>;

    /// Waits up to `timeout` for the registry to accept requests.
    ///
    /// Returns `false` when the registry did not become ready in time.
    async fn wait_until_ready(&self, timeout: Duration) -> bool;
}

/// Errors returned by marker registry implementations.
#[derive(Debug, Clone, Error)]
pub enum MarkerRegistryError {
    /// The lookup was rejected by the registry.
    #[error(transparent)]
    Lookup(#[from] RegistryLookupError),

    /// The registry is not running or its request queue is full.
    #[error("marker registry unavailable: {0}")]
    Unavailable(String),

    /// Transport-level failure.
    #[error("marker registry transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl MarkerRegistryError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
