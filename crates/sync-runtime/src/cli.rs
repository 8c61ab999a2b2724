//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "hlf_sync.toml";

/// Replicate a Hyperledger Fabric channel into a search index.
#[derive(Parser, Debug)]
#[command(name = "hlf-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sync a channel into the configured index
    Sync(SyncArgs),
}

/// Flags of the `sync` command. Every flag overrides the settings file.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// Settings file
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Channel to replicate
    #[arg(long)]
    pub channel: Option<String>,

    /// Organization the client acts for
    #[arg(long)]
    pub org: Option<String>,

    /// First block to fetch, ignoring the stored checkpoint
    #[arg(long = "block-number")]
    pub block_number: Option<u64>,

    /// Number of blocks per catch-up batch
    #[arg(long = "batch-index")]
    pub batch_index: Option<u64>,
}
