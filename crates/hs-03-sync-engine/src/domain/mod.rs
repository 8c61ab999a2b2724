//! Domain layer for the sync engine.

pub mod errors;
pub mod state;

pub use errors::SyncError;
pub use state::{BlockRange, Step, SyncPhase, SyncState};
