//! # HS-03 Sync Engine
//!
//! Keeps a search index in step with one Fabric channel.
//!
//! **Subsystem ID:** 03
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Phases
//!
//! | Phase | Entered when | Range applied | Then |
//! |-------|--------------|---------------|------|
//! | Init | startup | none | load checkpoint, resolve peers |
//! | CatchUp | lag > `max_allowed_lag` | `batch_size` blocks at most | next iteration immediately |
//! | Tailing | lag <= `max_allowed_lag` | everything up to the head | sleep `idle_interval` |
//!
//! Lag counts the blocks between the cursor and the head, head included.
//! The cursor moves only after the sink confirms a range; the checkpoint is
//! written right after and a failed write is not fatal.
//!
//! ## Module Structure
//!
//! ```text
//! hs-03-sync-engine/
//! ├── domain/          # SyncState, BlockRange, Step, SyncError
//! ├── algorithms/      # plan_step, chain_height, select_fresh_peers
//! ├── ports/           # LedgerClient + MockLedgerClient
//! ├── adapters/        # GatewayLedgerClient (HTTP)
//! ├── application/     # PeerResolver, SyncService
//! └── config.rs        # SyncConfig, LedgerConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::GatewayLedgerClient;
pub use algorithms::{chain_height, plan_step, select_fresh_peers};
pub use application::{PeerResolver, PeerSnapshot, SyncService};
pub use config::{LedgerConfig, SyncConfig};
pub use domain::{BlockRange, Step, SyncError, SyncPhase, SyncState};
pub use ports::{LedgerClient, MockLedgerClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
