//! Marker registry for discovered landmarks.
//!
//! The registry is the only state shared between behaviors. It maps marker
//! identifiers to the waypoint the robot occupied when the marker was first
//! seen, answers "nth-lowest-id" lookups, and periodically broadcasts the
//! full id-sorted snapshot. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - The single-owner store in [`adapters`]
//! - The request/reply service actor in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
