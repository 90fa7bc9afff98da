//! Adapter implementations for the marker registry.

pub mod memory;
