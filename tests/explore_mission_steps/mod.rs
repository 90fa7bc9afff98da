//! Step definitions for exploration mission scenarios.

pub mod world;

mod given;
mod then;
mod when;
