//! # Sync Service
//!
//! Drives a channel from its checkpoint to the head and keeps following it.
//!
//! ## Loop
//!
//! ```text
//! INIT ──→ resolve peers ──→ plan_step
//!              ↑                 │
//!              │   Idle ─────────┼──→ sleep(idle_interval)
//!              │   CatchUp ──────┼──→ apply batch, no sleep
//!              │   Tail ─────────┴──→ apply range, sleep(idle_interval)
//!              └─────────────────────────┘
//! ```
//!
//! Applying a range is fetch (in order), transform, merge, sink apply, then
//! checkpoint. The cursor advances as soon as the sink confirms; a failed
//! checkpoint write is logged and counted but does not stop the loop.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use hs_01_block_transformation::transform_blocks;
use hs_02_checkpoint_store::CheckpointStore;
use hs_04_storage_sinks::StorageSink;
use shared_types::Block;
use sync_telemetry::{
    time_histogram, BATCHES_APPLIED, BLOCKS_SYNCED, CHAIN_HEIGHT, CHECKPOINT_WRITE_FAILURES,
    DOCUMENTS_ADDED, DOCUMENTS_REMOVED, LAST_APPLIED_BLOCK, SINK_APPLY_DURATION, SYNC_ERRORS,
    TARGET_PEERS,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::algorithms::plan_step;
use crate::application::resolver::{PeerResolver, PeerSnapshot};
use crate::config::SyncConfig;
use crate::domain::{BlockRange, Step, SyncError, SyncPhase, SyncState};
use crate::ports::LedgerClient;

/// Sync Service - owns the cursor and the checkpoint.
pub struct SyncService<L: LedgerClient, S: StorageSink, C: CheckpointStore> {
    /// Configuration.
    config: SyncConfig,
    /// Ledger access.
    ledger: Arc<L>,
    /// Height and peer resolution over the same ledger.
    resolver: PeerResolver<L>,
    /// Downstream index.
    sink: Arc<S>,
    /// Durable progress marker.
    checkpoint: C,
    /// Cursor and last chain view.
    state: SyncState,
}

impl<L: LedgerClient, S: StorageSink, C: CheckpointStore> SyncService<L, S, C> {
    /// Create a new sync service.
    pub fn new(config: SyncConfig, ledger: Arc<L>, sink: Arc<S>, checkpoint: C) -> Self {
        let resolver = PeerResolver::new(Arc::clone(&ledger), config.peer_freshness_threshold);
        Self {
            config,
            ledger,
            resolver,
            sink,
            checkpoint,
            state: SyncState::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// The checkpoint store.
    pub fn checkpoint(&self) -> &C {
        &self.checkpoint
    }

    /// Position the cursor from the checkpoint (or the override) and take a
    /// first look at the channel.
    pub async fn init(&mut self) -> Result<(), SyncError> {
        let stored = self.checkpoint.load();
        let next_block = match (self.config.start_block_override, stored) {
            (Some(start), _) => {
                info!("[hs-03] Starting at block {} (override)", start);
                start
            }
            (None, Some(last)) => match last.checked_add(1) {
                Some(next) => next,
                None => {
                    warn!(
                        "[hs-03] Checkpoint {} has no successor, starting from block 0",
                        last
                    );
                    0
                }
            },
            (None, None) => 0,
        };

        self.state = SyncState::starting_at(next_block);
        self.refresh().await?;

        info!(
            channel = %self.config.channel_name,
            next_block,
            height = self.state.current_height,
            peers = self.state.target_peers.len(),
            "[hs-03] Sync initialized"
        );
        Ok(())
    }

    /// Re-read height and target peers.
    async fn refresh(&mut self) -> Result<(), SyncError> {
        let PeerSnapshot { height, targets } = self.resolver.resolve().await?;
        CHAIN_HEIGHT.set(height as f64);
        TARGET_PEERS.set(targets.len() as f64);

        self.state.current_height = height;
        self.state.target_peers = targets;
        Ok(())
    }

    /// Run one iteration: refresh, plan, and apply the planned range.
    pub async fn step(&mut self) -> Result<Step, SyncError> {
        self.refresh().await?;

        let step = plan_step(
            self.state.next_block,
            self.state.current_height,
            self.config.effective_batch_size(),
            self.config.max_allowed_lag,
        );

        match step {
            Step::Idle => {
                debug!(
                    next_block = self.state.next_block,
                    height = self.state.current_height,
                    "[hs-03] Up to date"
                );
            }
            Step::CatchUp(range) => {
                self.state.phase = SyncPhase::CatchUp;
                info!(
                    lag = self.state.lag(),
                    "[hs-03] Catching up {}",
                    range
                );
                self.apply_range(range).await?;
            }
            Step::Tail(range) => {
                self.state.phase = SyncPhase::Tailing;
                self.apply_range(range).await?;
            }
        }
        Ok(step)
    }

    /// Fetch, transform and apply `range`, then advance the cursor and
    /// persist the checkpoint.
    pub async fn apply_range(&mut self, range: BlockRange) -> Result<(), SyncError> {
        let blocks = self.fetch_range(range).await?;
        let result = transform_blocks(&blocks)?;

        {
            let _timer = time_histogram!(SINK_APPLY_DURATION);
            self.sink.apply(&result).await?;
        }

        self.state.next_block = range.end + 1;

        BLOCKS_SYNCED.inc_by(range.len() as f64);
        BATCHES_APPLIED
            .with_label_values(&[self.state.phase.as_str()])
            .inc();
        DOCUMENTS_ADDED.inc_by(result.to_add().len() as f64);
        DOCUMENTS_REMOVED.inc_by(result.to_remove().len() as f64);
        LAST_APPLIED_BLOCK.set(range.end as f64);

        info!(
            added = result.to_add().len(),
            removed = result.to_remove().len(),
            sink = self.sink.name(),
            "[hs-03] Applied blocks {}",
            range
        );

        if let Err(e) = self.checkpoint.save(range.end) {
            CHECKPOINT_WRITE_FAILURES.inc();
            warn!("[hs-03] Checkpoint not persisted, continuing: {}", e);
        }
        Ok(())
    }

    /// Fetch every block of `range` in ascending order.
    async fn fetch_range(&self, range: BlockRange) -> Result<Vec<Block>, SyncError> {
        let ledger = &self.ledger;
        let targets = self.state.target_peers.as_slice();
        let timeout = self.config.fetch_timeout();
        let timeout_secs = self.config.fetch_timeout_secs;

        stream::iter(range.numbers())
            .map(move |number| async move {
                let block = tokio::time::timeout(timeout, ledger.get_block(number, targets))
                    .await
                    .map_err(|_| SyncError::FetchTimeout {
                        block: number,
                        timeout_secs,
                    })??;
                if block.number != number {
                    return Err(SyncError::BlockMismatch {
                        requested: number,
                        received: block.number,
                    });
                }
                Ok::<Block, SyncError>(block)
            })
            .buffered(self.config.effective_fetch_concurrency())
            .try_collect()
            .await
    }

    /// Run until `shutdown` flips (or its sender is dropped) or a fatal
    /// error occurs.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), SyncError> {
        if *shutdown.borrow() {
            return Ok(());
        }

        let init = tokio::select! {
            result = self.init() => result,
            _ = shutdown.changed() => {
                info!("[hs-03] Shutdown signal received");
                return Ok(());
            }
        };
        init.map_err(Self::record_failure)?;

        loop {
            let step = tokio::select! {
                result = self.step() => result,
                _ = shutdown.changed() => {
                    info!("[hs-03] Shutdown signal received");
                    break;
                }
            };

            match step.map_err(Self::record_failure)? {
                Step::CatchUp(_) => continue,
                Step::Idle | Step::Tail(_) => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.config.idle_interval()) => {}
                        _ = shutdown.changed() => {
                            info!("[hs-03] Shutdown signal received");
                            break;
                        }
                    }
                }
            }
        }

        info!(
            next_block = self.state.next_block,
            "[hs-03] Sync stopped"
        );
        Ok(())
    }

    fn record_failure(e: SyncError) -> SyncError {
        SYNC_ERRORS.with_label_values(&[e.kind()]).inc();
        error!("[hs-03] Sync failed: {}", e);
        e
    }
}
