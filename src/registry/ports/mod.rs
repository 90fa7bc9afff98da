//! Port contracts for the marker registry.
//!
//! Behaviors depend on these interfaces rather than on the service actor so
//! tests can substitute in-process doubles.

pub mod registry;

pub use registry::{MarkerRegistry, MarkerRegistryError, MarkerRegistryResult};
