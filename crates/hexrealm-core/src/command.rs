//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
///
/// Every command targets exactly one aggregate stream. The dispatcher uses
/// `target_stream` to serialize writers per aggregate instance.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Routing name for this command, e.g. `"game.start_game"`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The aggregate stream this command writes to.
    fn target_stream(&self) -> Uuid;
}
