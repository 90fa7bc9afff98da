//! Application services for the marker registry.

mod actor;

pub use actor::{RegistryHandle, RegistryService};
