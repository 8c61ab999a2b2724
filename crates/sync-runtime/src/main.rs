//! `hlf-sync` binary.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use sync_runtime::{Cli, Command, Settings, SyncArgs, SyncRuntime};
use sync_telemetry::{encode_metrics, init_telemetry, TelemetryConfig, BLOCKS_SYNCED, LAST_APPLIED_BLOCK};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_telemetry(&TelemetryConfig::from_env()).context("initializing telemetry")?;

    match cli.command {
        Command::Sync(args) => sync(args).await,
    }
}

async fn sync(args: SyncArgs) -> Result<()> {
    let settings = Settings::resolve(&args).context("loading settings")?;
    info!(
        channel = %settings.sync.channel_name,
        org = %settings.ledger.org,
        gateway = %settings.ledger.gateway_url,
        "Starting hlf-sync"
    );

    let service = SyncRuntime::build_service(&settings)?;
    let mut runtime = SyncRuntime::new();
    runtime.start(service);

    info!("Sync is running. Press Ctrl+C to stop.");
    let outcome = tokio::select! {
        result = runtime.wait() => result,
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for Ctrl+C")?;
            runtime.shutdown().await
        }
    };

    log_metrics_summary();
    if let Err(e) = &outcome {
        error!("hlf-sync stopped: {:#}", e);
    }
    outcome
}

fn log_metrics_summary() {
    info!(
        blocks_synced = BLOCKS_SYNCED.get(),
        last_applied_block = LAST_APPLIED_BLOCK.get(),
        "Sync summary"
    );
    match encode_metrics() {
        Ok(text) => tracing::debug!("Final metrics:\n{}", text),
        Err(e) => error!("Failed to encode metrics: {}", e),
    }
}
