//! # Sync Runtime
//!
//! Builds the production components from [`Settings`] and supervises the
//! sync task.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use hs_02_checkpoint_store::{KvCheckpointStore, RocksDbStore};
use hs_03_sync_engine::{GatewayLedgerClient, SyncError, SyncService};
use hs_04_storage_sinks::SinkBackend;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::settings::Settings;

/// The service as wired in production.
pub type ProductionSyncService =
    SyncService<GatewayLedgerClient, SinkBackend, KvCheckpointStore<RocksDbStore>>;

/// Owns the sync task and its shutdown signal.
pub struct SyncRuntime {
    /// Sync task, present between `start` and `wait`.
    task: Option<JoinHandle<Result<(), SyncError>>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl Default for SyncRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncRuntime {
    /// Create a runtime with no task running.
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            task: None,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Build the production service described by `settings`.
    ///
    /// ## Initialization Order
    ///
    /// 1. Checkpoint database (fails fast on a locked or unreadable directory)
    /// 2. Sink backend
    /// 3. Ledger gateway client
    pub fn build_service(settings: &Settings) -> Result<ProductionSyncService> {
        let store = RocksDbStore::open(settings.checkpoint.rocksdb_config())
            .with_context(|| format!("opening checkpoint database {}", settings.checkpoint.path))?;
        let checkpoint = KvCheckpointStore::new(store);

        let sink = SinkBackend::from_config(&settings.database).context("configuring sink")?;

        let ledger =
            GatewayLedgerClient::new(settings.ledger.clone(), settings.sync.channel_name.clone())
                .context("configuring ledger client")?;

        Ok(SyncService::new(
            settings.sync.clone(),
            Arc::new(ledger),
            Arc::new(sink),
            checkpoint,
        ))
    }

    /// Spawn `service` as the sync task.
    pub fn start(&mut self, mut service: ProductionSyncService) {
        let shutdown = self.shutdown_rx.clone();
        self.task = Some(tokio::spawn(async move { service.run(shutdown).await }));
        info!("[hs-03] Sync task started");
    }

    /// Wait for the sync task to end on its own (fatal error or shutdown).
    /// Cancelling this future leaves the task in place for `shutdown`.
    pub async fn wait(&mut self) -> Result<()> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };
        let joined = task.await;
        self.task = None;
        joined.context("sync task panicked")??;
        Ok(())
    }

    /// Whether the task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Shutdown gracefully.
    ///
    /// ## Shutdown Sequence
    ///
    /// 1. Signal the sync task to stop
    /// 2. Wait for it (with timeout)
    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let Some(task) = self.task.take() else {
            return Ok(());
        };
        match tokio::time::timeout(Duration::from_secs(10), task).await {
            Ok(joined) => {
                joined.context("sync task panicked")??;
                info!("Shutdown complete");
                Ok(())
            }
            Err(_) => anyhow::bail!("sync task did not stop within 10s"),
        }
    }
}
