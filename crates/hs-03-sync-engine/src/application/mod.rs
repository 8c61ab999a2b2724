//! Application layer: peer resolution and the sync loop.

pub mod resolver;
pub mod service;

pub use resolver::{PeerResolver, PeerSnapshot};
pub use service::SyncService;
