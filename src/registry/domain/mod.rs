//! Domain model for the marker registry.
//!
//! Records are keyed by marker id with latest-write-wins semantics and are
//! never removed for the lifetime of the owning process.

mod error;
mod ids;
mod record;

pub use error::{RegistryDomainError, RegistryLookupError};
pub use ids::{MarkerId, WaypointName};
pub use record::{MarkerRecord, RegistrySnapshot};
