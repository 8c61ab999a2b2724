//! # HLF-Sync Runtime
//!
//! Entry point wiring for the `hlf-sync` binary.
//!
//! ## Startup Sequence
//!
//! 1. Parse the command line
//! 2. Initialize telemetry (logging + metrics)
//! 3. Resolve settings (file, then `HLF_*` environment, then flags)
//! 4. Open the checkpoint database, build the sink and ledger client
//! 5. Spawn the sync task and wait for Ctrl+C or a fatal error
//!
//! ## Modular Structure
//!
//! - `cli` - clap definitions
//! - `settings` - layered TOML/env/flag configuration
//! - `runtime` - component construction and task supervision

pub mod cli;
pub mod runtime;
pub mod settings;

pub use cli::{Cli, Command, SyncArgs};
pub use runtime::{ProductionSyncService, SyncRuntime};
pub use settings::{CheckpointSettings, ConfigError, Settings};
