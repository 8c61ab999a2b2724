//! # Inbound Ports

use crate::domain::CheckpointError;

/// Durable "last block fully synced" marker.
pub trait CheckpointStore: Send {
    /// Highest block number fully applied, if one was recorded.
    ///
    /// Unreadable or corrupt markers are reported as `None`.
    fn load(&self) -> Option<u64>;

    /// Record `block` as fully applied.
    fn save(&mut self, block: u64) -> Result<(), CheckpointError>;
}
