//! Marker explorer: coordination core for an exploring mobile robot.
//!
//! The crate drives a robot through a fixed task plan with independently
//! polled behavior state machines, and lets behaviors hand discovered
//! markers to one another through a marker registry service.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure state and value types with no infrastructure
//!   dependencies
//! - **Ports**: Abstract trait interfaces for the robot, storage and registry
//! - **Adapters**: Concrete implementations of ports (in-memory, disk,
//!   simulation)
//!
//! # Modules
//!
//! - [`registry`]: Marker registry store, actor service and client handle
//! - [`behavior`]: Align, move, rotate-and-detect and photograph behaviors
//!   plus the plan executor
//! - [`config`]: Runtime configuration
//! - [`telemetry`]: Tracing setup for binaries

pub mod behavior;
pub mod config;
pub mod registry;
pub mod telemetry;
