//! Velocity command output.

use crate::behavior::domain::VelocityCommand;

/// Destination for base velocity commands.
///
/// Publishing is fire-and-forget; implementations must not block.
pub trait VelocitySink: Send + Sync {
    /// Publishes one command.
    fn publish(&self, command: VelocityCommand);
}
