//! # HS-02 Checkpoint Store
//!
//! Durable marker of the highest block fully applied to the sink.
//!
//! **Subsystem ID:** 02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Contract
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `load` | `Some(n)` if a valid marker exists, `None` (with a warning) otherwise |
//! | `save(n)` | Overwrites the marker; failure is reported, never panics |
//!
//! The marker is stored under the key `current_block` as decimal text, so a
//! database written by earlier deployments stays readable.
//!
//! ## Module Structure
//!
//! ```text
//! hs-02-checkpoint-store/
//! ├── domain/          # KvStoreError, CheckpointError
//! ├── ports/           # CheckpointStore (inbound) + KeyValueStore (outbound)
//! ├── adapters/        # RocksDbStore
//! └── service.rs       # KvCheckpointStore
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use domain::{CheckpointError, KvStoreError};
pub use ports::{CheckpointStore, InMemoryKVStore, KeyValueStore};
pub use service::{KvCheckpointStore, CHECKPOINT_KEY};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
