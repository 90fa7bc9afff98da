//! Port implementations: in-memory doubles, disk storage and a simulated
//! robot.

pub mod filesystem;
pub mod memory;
pub mod simulation;
