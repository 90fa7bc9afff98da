//! Polled robot behaviors and the plan executor.
//!
//! Each behavior is a small state machine ticked at a fixed period by the
//! [`services::ActionRunner`]. Sensor input arrives out of band through a
//! bounded per-behavior inbox that is drained at the start of every tick,
//! and each tick returns a [`domain::TaskOutcome`] instead of failing.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Behaviors and the executor in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
